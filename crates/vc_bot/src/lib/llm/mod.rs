pub mod completion;
pub mod openai;
