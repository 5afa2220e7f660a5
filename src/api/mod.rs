pub mod client;
pub mod transactions;

#[cfg(test)]
mod test_server;
