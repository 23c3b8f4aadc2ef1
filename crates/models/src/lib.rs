pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod category;
pub mod business;
pub mod event;
pub mod profession;
pub mod review;

#[cfg(test)]
mod tests;
