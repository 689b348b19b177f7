use crate::bits::reader::BoundedReader;
use crate::errors::{DemuxResult, ParseError};
use crate::mp4::movie::Track;
use std::io::{Read, Seek};

/// Decode a sample size box (stsz) or its compact variant (stz2).
///
/// A nonzero fixed size means every sample shares it and no table follows.
/// Otherwise one size per sample is read; stz2 packs entries at 16, 8, or 4
/// bits, the 4-bit form holding two samples per byte, high nibble first.
pub(crate) fn parse<R: Read + Seek>(
    rd: &mut BoundedReader<R>,
    compact: bool,
    tr: &mut Track,
) -> DemuxResult<()> {
    // stz2 reuses the first field as reserved(24) + field_size(8)
    let sample_size = rd.read_uint(4);
    let sample_count = rd.read_uint(4);
    tr.sample_count = sample_count;

    let mut sizes = Vec::new();
    sizes
        .try_reserve_exact(sample_count as usize)
        .map_err(|_| ParseError::new("out of memory sizing sample table"))?;

    if !compact {
        for _ in 0..sample_count {
            sizes.push(if sample_size != 0 {
                sample_size
            } else {
                rd.read_uint(4)
            });
        }
    } else {
        match sample_size & 0xFF {
            16 => {
                for _ in 0..sample_count {
                    sizes.push(rd.read_uint(2));
                }
            }
            8 => {
                for _ in 0..sample_count {
                    sizes.push(rd.read_uint(1));
                }
            }
            4 => {
                let mut carry = 0u32;
                for i in 0..sample_count {
                    if i & 1 == 0 {
                        carry = rd.read_uint(1);
                        sizes.push(carry >> 4);
                    } else {
                        sizes.push(carry & 15);
                    }
                }
            }
            width => {
                return Err(
                    ParseError::new(format!("unsupported compact sample size width {}", width))
                        .into(),
                )
            }
        }
    }

    tr.entry_sizes = sizes;
    Ok(())
}
