pub mod aggregate;
pub mod band_scale;
mod literal;
pub mod record;
pub mod scale;
pub mod ticks;
pub mod time_scale;
pub mod types;

pub use aggregate::{
    AggregatedPoint, DEFAULT_TOP_N, Metric, aggregate, rank_top_n, ranked_by_title,
    sort_by_key_ascending, yearly_totals,
};
pub use band_scale::BandScale;
pub use literal::decode_literal;
pub use record::{
    Dataset, ParseReport, RawRow, RawValue, Record, parse_dataset, parse_record,
    parse_record_with_report,
};
pub use scale::{LinearScale, ScalePadding, extent};
pub use ticks::{cut_text, format_money_tick, format_si, linear_ticks};
pub use time_scale::TimeScale;
pub use types::{ChartLayout, Margins, Viewport};
