//! Core traits for compression codecs.
//!
//! Every codec that can back an archive implements [`Codec`]. The archive
//! container treats codec output as opaque: it only frames it, so the trait is
//! whole-buffer rather than streaming.

use crate::error::Result;
use crate::markers::{ESCAPE_MARKER, find_marker};

/// A whole-buffer compression codec.
///
/// Codecs keep no state between calls; any codebook or dictionary lives only
/// for the duration of a single `compress` or `decompress`.
pub trait Codec {
    /// ASCII tag identifying the codec in archive metadata.
    fn name(&self) -> &'static str;

    /// Compress `data` into a self-contained encoded buffer.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress a buffer produced by [`Codec::compress`].
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Self-describing metadata: the tag followed by codec parameters.
    fn metadata(&self) -> Vec<u8> {
        self.name().as_bytes().to_vec()
    }

    /// Byte sequences the codec reserves for its own control markers.
    fn forbidden_markers(&self) -> Vec<&'static [u8]> {
        vec![ESCAPE_MARKER.as_slice()]
    }

    /// Return the offset of the first reserved marker occurring in `data`.
    fn find_forbidden(&self, data: &[u8]) -> Option<usize> {
        self.forbidden_markers()
            .into_iter()
            .filter_map(|marker| find_marker(data, marker))
            .min()
    }

    /// Check whether `data` can be encoded by this codec.
    fn accepts(&self, data: &[u8]) -> bool {
        self.find_forbidden(data).is_none()
    }
}

impl<C: Codec + ?Sized> Codec for &C {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        (**self).compress(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        (**self).decompress(data)
    }

    fn metadata(&self) -> Vec<u8> {
        (**self).metadata()
    }

    fn forbidden_markers(&self) -> Vec<&'static [u8]> {
        (**self).forbidden_markers()
    }
}
