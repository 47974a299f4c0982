mod identifier;
mod product;
