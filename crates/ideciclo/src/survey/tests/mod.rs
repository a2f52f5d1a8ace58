mod common;
mod rating;
mod routing;
