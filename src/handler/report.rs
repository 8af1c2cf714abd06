use chrono::{DateTime, Utc};

use crate::types::SpikeRecord;

/// Renders the spike list as Telegram-flavoured HTML. Each spike is a
/// two-line block followed by a blank line, so chunked delivery can only
/// ever cut between records and bold tags stay balanced per chunk.
pub fn format_report(
    spikes: &[SpikeRecord],
    now: DateTime<Utc>,
    next_check_hour: u32,
) -> String {
    if spikes.is_empty() {
        return format!(
            "No TVL spikes today.\nNext check: tomorrow at {:02}:00 UTC",
            next_check_hour
        );
    }

    let mut report = format!(
        "<b>TVL SPIKES DETECTED</b> ({})\n",
        now.format("%Y-%m-%d")
    );

    for spike in spikes {
        let chain = spike.chain.as_deref().unwrap_or("unknown");
        report.push('\n');
        report.push_str(&format!(
            "<b>{}</b> (+{:.1}%) → <b>${}B</b> [{}]\n{}\n",
            spike.name, spike.change_percent, spike.tvl_billions, chain, spike.url
        ));
    }

    report
}
