pub mod contact;
pub mod faq;
pub mod order;
pub mod product;
