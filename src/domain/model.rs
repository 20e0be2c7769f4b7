pub mod daily_cap;
pub mod order;
pub mod product_stock;
pub mod time_slot;
pub mod value_objects;

pub use daily_cap::{DailyCap, DEFAULT_DAILY_LIMIT};
pub use order::Order;
pub use product_stock::ProductStock;
pub use time_slot::{generate_slots, TimeSlot};
pub use value_objects::{
    Currency, DayDate, DeliveryType, ItemQuantity, Money, OrderId, PaymentMethod, ProductId,
    SlotId, TimeOfDay,
};
