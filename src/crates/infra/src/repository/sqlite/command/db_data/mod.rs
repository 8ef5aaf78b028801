pub mod best_selling;
pub mod num_invoices;
pub mod num_items;
