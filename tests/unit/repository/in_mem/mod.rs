mod cart;
mod client;
mod product;
