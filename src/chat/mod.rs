mod telegram;

pub use telegram::{
    classify, describe_sender, parse_command, Inbound, Message, TelegramApi, TelegramBot,
    TelegramBotConfig, Update, GREETING_MESSAGE, UNSUPPORTED_MESSAGE,
};
