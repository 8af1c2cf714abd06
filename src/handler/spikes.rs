use crate::{
    model::Snapshot,
    types::{ProtocolRecord, SpikeRecord},
};

/// Materiality floor for persisted snapshot entries, in USD.
pub const TVL_FLOOR: f64 = 1_000_000.0;

/// Minimum growth, in percent, for a protocol to make the report.
/// Inclusive at exactly the threshold.
pub const SPIKE_THRESHOLD_PERCENT: f64 = 10.0;

/// Reduces the raw feed to the mapping that gets persisted as tomorrow's
/// baseline. Records without a numeric TVL are dropped; duplicate names
/// resolve last-write-wins in feed order.
pub fn filter_snapshot(records: &[ProtocolRecord]) -> Snapshot {
    let mut snapshot = Snapshot::new();

    for record in records {
        if let Some(tvl) = record.tvl {
            if tvl > TVL_FLOOR {
                snapshot.insert(record.name.to_owned(), tvl);
            }
        }
    }

    snapshot
}

/// Compares today's feed against the prior snapshot, preserving feed order.
/// A record with no prior entry, or a prior value that is not strictly
/// positive, has no usable baseline and is skipped.
pub fn detect_spikes(
    today: &[ProtocolRecord],
    prior: &Snapshot,
) -> Vec<SpikeRecord> {
    let mut spikes = Vec::new();

    for record in today {
        let Some(tvl) = record.tvl else {
            continue;
        };
        let Some(&old_tvl) = prior.get(&record.name) else {
            continue;
        };
        if old_tvl <= 0.0 {
            continue;
        }

        let change = (tvl - old_tvl) / old_tvl * 100.0;
        if change < SPIKE_THRESHOLD_PERCENT {
            continue;
        }

        spikes.push(SpikeRecord {
            name: record.name.to_owned(),
            change_percent: change,
            tvl_billions: format!("{:.2}", tvl / 1e9),
            chain: record.chain.clone(),
            url: record
                .url
                .clone()
                .unwrap_or_else(|| protocol_url(&record.name)),
        });
    }

    spikes
}

fn protocol_url(name: &str) -> String {
    let lower = name.to_lowercase();
    let slug = lower.split_whitespace().collect::<Vec<_>>().join("-");
    format!("https://defillama.com/protocol/{}", slug)
}
