pub mod component;
pub mod document_counter;
pub mod inventory_movement;
pub mod location;
pub mod lot;
pub mod purchase_order;
pub mod remission;
pub mod remission_line;
pub mod stock_balance;
pub mod supplier_return;
