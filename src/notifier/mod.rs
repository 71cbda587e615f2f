// Delivery of analysis results: report formatting and Telegram notifications

pub mod report;
pub mod telegram;

pub use telegram::TelegramNotifier;
