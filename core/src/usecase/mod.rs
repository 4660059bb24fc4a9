pub mod calendar;

#[cfg(test)]
mod calendar_test;
