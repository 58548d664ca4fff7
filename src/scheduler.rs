// Concurrent fan-out of search tasks over the configured combinations

use futures::stream::{self, StreamExt};

use crate::config::SearchConfig;
use crate::dates::{expand_range, DateRangeError};
use crate::report::Report;
use crate::search::FareSearch;

// Upper bound on simultaneously running search tasks within one phase.
pub const MAX_CONCURRENT_SEARCHES: usize = 5;

// One (date, origin, destination) argument triple in submission order.
type SearchRequest = (String, String, String);

// Cartesian product for one phase: origin outer, destination middle,
// date inner. Outbound requests swap the origin and destination
// arguments; this mirrors the observed directional convention of the
// wrapped API and must not be "corrected" without re-checking the live
// contract.
fn phase_requests(config: &SearchConfig, dates: &[String], outbound: bool) -> Vec<SearchRequest> {
    let mut requests =
        Vec::with_capacity(config.origins.len() * config.destinations.len() * dates.len());
    for origin in &config.origins {
        for destination in &config.destinations {
            for date in dates {
                if outbound {
                    requests.push((date.clone(), destination.clone(), origin.clone()));
                } else {
                    requests.push((date.clone(), origin.clone(), destination.clone()));
                }
            }
        }
    }
    requests
}

async fn run_phase<S: FareSearch>(
    search: &S,
    report: &Report,
    requests: Vec<SearchRequest>,
    is_return: bool,
) {
    stream::iter(requests)
        .for_each_concurrent(MAX_CONCURRENT_SEARCHES, |(date, origin, destination)| async move {
            let flight = search.search(&date, &origin, &destination).await;
            report.add(flight, is_return);
        })
        .await;
}

fn report_title(config: &SearchConfig) -> String {
    format!(
        "Search for {:?}[{} ~ {}] <> {:?}[{} ~ {}]",
        config.origins,
        config.depart_start,
        config.depart_end,
        config.destinations,
        config.return_start,
        config.return_end
    )
}

// Run every search for one config and collect the results. The outbound
// phase drains completely before any return task is submitted. Tasks
// within a phase complete in arbitrary order, so the report's append
// order is non-deterministic across runs.
pub async fn run_config<S: FareSearch>(
    search: &S,
    config: &SearchConfig,
) -> Result<Report, DateRangeError> {
    let depart_dates = expand_range(&config.depart_start, &config.depart_end)?;
    let return_dates = expand_range(&config.return_start, &config.return_end)?;

    let report = Report::new(report_title(config));

    tracing::info!(title = report.title(), "starting outbound search phase");
    run_phase(search, &report, phase_requests(config, &depart_dates, true), false).await;

    tracing::info!("starting return search phase");
    run_phase(search, &report, phase_requests(config, &return_dates, false), true).await;

    Ok(report)
}
