// 駆動される側アダプター（リポジトリ実装など）

mod console_logger;
mod daily_cap_repository;
mod order_repository;
mod slot_repository;
mod stock_repository;
mod system_clock;

pub use console_logger::ConsoleLogger;
pub use daily_cap_repository::MySqlDailyCapRepository;
pub use order_repository::MySqlOrderRepository;
pub use slot_repository::MySqlSlotRepository;
pub use stock_repository::MySqlStockRepository;
pub use system_clock::SystemClock;
