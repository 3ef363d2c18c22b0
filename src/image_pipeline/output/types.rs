use std::fmt;

use chrono::NaiveDateTime;

use crate::image_pipeline::raw::types::Corner;

/// Header timestamp layout, e.g. `08:46 15/03-2005`.
pub const TIMESTAMP_FORMAT: &str = "%H:%M %d/%m-%Y";

/// One byte-packed channel, same length and order as its raw counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibratedChannel {
    pub channel_id: u8,
    pub samples: Vec<u8>,
}

/// Ordered, distinct channel ids as listed in the MITIFF header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelList(Vec<u8>);

impl ChannelList {
    /// Keeps non-zero ids in first-seen order, dropping repeats.
    ///
    /// A zero (unrecorded) id in the first position is read as channel 1,
    /// which is how older level-2 files label a single-channel product.
    pub fn from_ids(ids: &[u8]) -> Self {
        let mut list = Vec::with_capacity(ids.len().max(1));
        if ids.first().copied().unwrap_or(0) == 0 {
            list.push(1);
        }
        for &id in ids {
            if id != 0 && !list.contains(&id) {
                list.push(id);
            }
        }
        Self(list)
    }

    pub fn ids(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ChannelList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}

/// Calibrated pass ready for serialization
#[derive(Debug, Clone)]
pub struct OutputImage {
    pub satellite_id: String,
    pub acquired_at: NaiveDateTime,
    pub channel_list: ChannelList,
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Reference corner in the target grid convention
    pub corner: Corner,
    pub scale_ax: f64,
    pub scale_ay: f64,
    /// Formulas that invert the byte scales, shown verbatim by viewers
    pub calibration_annotation: String,
    pub area_name: String,
    pub channels: Vec<CalibratedChannel>,
}

impl OutputImage {
    /// Acquisition time as `HH:MM DD/MM-YYYY`.
    pub fn timestamp(&self) -> String {
        self.acquired_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_list_keeps_order() {
        assert_eq!(ChannelList::from_ids(&[1, 3, 4]).to_string(), "1 3 4");
        assert_eq!(ChannelList::from_ids(&[4, 2, 1]).to_string(), "4 2 1");
    }

    #[test]
    fn test_channel_list_drops_repeats() {
        let list = ChannelList::from_ids(&[2, 2, 5, 2]);
        assert_eq!(list.ids(), &[2, 5]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_unrecorded_first_channel_reads_as_one() {
        assert_eq!(ChannelList::from_ids(&[0]).to_string(), "1");
        assert!(ChannelList::from_ids(&[0, 4]).to_string().starts_with('1'));
        assert_eq!(ChannelList::from_ids(&[0, 1, 2]).to_string(), "1 2");
        assert_eq!(ChannelList::from_ids(&[]).to_string(), "1");
    }
}
