mod helpers;
mod segments;
