pub mod glpi;
pub mod openai;
