use super::*;

pub(crate) struct PendingFetch {
  pub(crate) page: usize,
  pub(crate) query: String,
  pub(crate) request_id: u64,
}
