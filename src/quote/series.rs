use crate::models::ChartPoint;
use chrono::{DateTime, FixedOffset, Offset, Utc};

const TIME_FORMAT: &str = "%I:%M %p";

/// Offset the exchange reports in seconds east of UTC, or UTC when it reports none.
pub fn exchange_offset(gmt_offset: Option<i32>) -> FixedOffset {
    gmt_offset
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

pub fn format_time(timestamp: i64, offset: &FixedOffset) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|time| time.with_timezone(offset).format(TIME_FORMAT).to_string())
}

fn usable_price(price: Option<f64>) -> Option<f64> {
    price.filter(|price| price.is_finite() && *price > 0.0)
}

/// Builds the chart series from raw samples.
///
/// Timestamps and prices are paired from the most recent end, so a shorter price array lines up
/// with the latest timestamps. The samples are ordered by time, only the last `window` are kept,
/// and samples without a strictly positive price are dropped from that window.
pub fn build_series(
    timestamps: &[i64],
    closes: &[Option<f64>],
    window: usize,
    offset: &FixedOffset,
) -> Vec<ChartPoint> {
    let paired = timestamps.len().min(closes.len());
    let mut samples: Vec<(i64, Option<f64>)> = timestamps[timestamps.len() - paired..]
        .iter()
        .copied()
        .zip(closes[closes.len() - paired..].iter().copied())
        .collect();

    // Of samples sharing a timestamp, the one reported last is kept.
    samples.sort_by_key(|(timestamp, _)| *timestamp);
    samples.dedup_by(|later, kept| {
        if later.0 != kept.0 {
            return false;
        }
        *kept = *later;
        true
    });

    let start = samples.len().saturating_sub(window);
    samples[start..]
        .iter()
        .filter_map(|&(timestamp, price)| {
            let price = usable_price(price)?;
            let time = format_time(timestamp, offset)?;
            Some(ChartPoint {
                time,
                timestamp,
                price,
            })
        })
        .collect()
}
