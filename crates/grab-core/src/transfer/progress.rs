//! Progress reporting hook for transfers.
//!
//! The transfer only counts bytes; rendering (bars, rates, ETA) belongs to
//! whoever implements [`ProgressSink`].

/// Receives byte counts as a transfer writes to disk.
pub trait ProgressSink {
    /// Called once before the body arrives with the expected number of bytes
    /// still to be written (`None` when the server did not declare a length).
    fn start(&self, total: Option<u64>);

    /// Called for every chunk written, with that chunk's size.
    fn advance(&self, bytes: u64);

    /// Called once when the transfer ends, successfully or not.
    fn finish(&self);
}
