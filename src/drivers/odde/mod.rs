pub mod driver;
pub mod phys;

#[cfg(test)]
pub mod phys_test;
