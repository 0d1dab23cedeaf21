//! Result assembler: joins accumulated counters with the population index.

use kpi_ingest::PopulationIndex;
use kpi_model::{GrandTotal, GroupResult, KpiReport, PopulationEntry, ReportPeriod};

use crate::aggregator::Aggregator;

/// Builds the final report from a finished aggregator.
///
/// Every group receives the population entry declared for its key (zero
/// when absent). The grand-total population is the sum of the entries
/// attached to the report's groups. Population keys without any registry
/// row are listed separately in key order.
pub fn assemble(
    aggregator: Aggregator,
    population: &PopulationIndex,
    missing_headers: Vec<String>,
    period: ReportPeriod,
) -> KpiReport {
    let mut total_population = PopulationEntry::default();
    let groups: Vec<GroupResult> = aggregator
        .groups
        .into_iter()
        .map(|(key, tally)| {
            let entry = population.get(&key);
            total_population += entry;
            GroupResult {
                key,
                row_count: tally.row_count,
                counters: tally.counters,
                population: entry,
            }
        })
        .collect();

    let unmatched_population = population
        .iter()
        .filter(|(key, _)| {
            groups
                .binary_search_by(|group| group.key.cmp(key))
                .is_err()
        })
        .map(|(key, entry)| (key.clone(), *entry))
        .collect();

    KpiReport {
        period,
        total: GrandTotal {
            row_count: aggregator.row_count,
            counters: aggregator.total,
            population: total_population,
            missing_headers,
        },
        issues: aggregator.issues,
        groups,
        unmatched_population,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpi_model::{GroupKey, KpiCounters};

    #[test]
    fn test_population_join_and_unmatched_keys() {
        let matched = GroupKey::new("Caldas", "Manizales", "IPS Sur");
        let orphan = GroupKey::new("Caldas", "Chinchina", "IPS Centro");
        let no_population = GroupKey::new("Antioquia", "Bello", "IPS Norte");

        let population: PopulationIndex = vec![
            (matched.clone(), PopulationEntry { hta: 10, dm: 4 }),
            (orphan.clone(), PopulationEntry { hta: 3, dm: 1 }),
        ]
        .into_iter()
        .collect();

        let mut aggregator = Aggregator::new();
        let counters = KpiCounters {
            hta_controlled: 1,
            ..KpiCounters::default()
        };
        aggregator.add_row(matched.clone(), counters);
        aggregator.add_row(matched.clone(), counters);
        aggregator.add_row(no_population.clone(), KpiCounters::default());

        let report = assemble(
            aggregator,
            &population,
            vec!["FECHA DE CREATININA".to_string()],
            ReportPeriod::new(2025, 7).unwrap(),
        );

        let keys: Vec<&GroupKey> = report.groups.iter().map(|g| &g.key).collect();
        assert_eq!(keys, vec![&no_population, &matched]);
        assert_eq!(report.groups[0].population, PopulationEntry::default());
        assert_eq!(report.groups[1].population, PopulationEntry { hta: 10, dm: 4 });
        assert_eq!(report.groups[1].row_count, 2);

        assert_eq!(report.total.row_count, 3);
        assert_eq!(report.total.counters.hta_controlled, 2);
        assert_eq!(report.total.population, PopulationEntry { hta: 10, dm: 4 });
        assert_eq!(report.total.missing_headers, vec!["FECHA DE CREATININA"]);
        assert_eq!(
            report.unmatched_population,
            vec![(orphan, PopulationEntry { hta: 3, dm: 1 })]
        );
        assert_eq!(report.total.indicators().hta_general, Some(0.2));
    }
}
