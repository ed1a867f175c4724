use rustc_hash::FxHashMap;

use crate::combinations::for_each_combination;
use crate::error::RuleError;
use crate::itemset::Itemset;

/// An association rule `antecedent -> consequent`, with the support of the
/// full itemset and the confidence ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub support: u64,
    pub confidence: f64,
}

/// Derives association rules from a frequent-itemset table.
///
/// Every non-empty proper subset of each itemset of size >= 2 is tried as
/// an antecedent; the rule is kept when
/// `support(itemset) / support(antecedent)` reaches `min_confidence`. An
/// antecedent missing from the table is reported as an error: downward
/// closure guarantees it was counted, so its absence is an upstream defect
/// rather than a low-confidence rule.
pub fn extract_rules(
    frequent: &[(Itemset, u64)],
    min_confidence: f64,
) -> Result<Vec<Rule>, RuleError> {
    let supports: FxHashMap<&Itemset, u64> = frequent
        .iter()
        .map(|(itemset, support)| (itemset, *support))
        .collect();

    let mut rules = Vec::new();
    let mut antecedents = Vec::new();

    for (itemset, itemset_support) in frequent {
        if itemset.len() < 2 {
            continue;
        }

        for size in 1..itemset.len() {
            antecedents.clear();
            for_each_combination(itemset.items(), size, &mut |combo| {
                antecedents.push(Itemset::new(combo.to_vec()));
            });

            for antecedent in antecedents.drain(..) {
                let antecedent_support = supports.get(&antecedent).copied().ok_or_else(|| {
                    RuleError::MissingAntecedent {
                        antecedent: antecedent.clone(),
                    }
                })?;

                let confidence = *itemset_support as f64 / antecedent_support as f64;
                if confidence >= min_confidence {
                    rules.push(Rule {
                        consequent: itemset.difference(&antecedent),
                        antecedent,
                        support: *itemset_support,
                        confidence,
                    });
                }
            }
        }
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<(Itemset, u64)> {
        vec![
            (Itemset::single(1), 4),
            (Itemset::single(2), 4),
            (Itemset::single(3), 4),
            (Itemset::new(vec![1, 2]), 3),
            (Itemset::new(vec![1, 3]), 3),
            (Itemset::new(vec![2, 3]), 3),
        ]
    }

    #[test]
    fn confidence_is_support_ratio() {
        let rules = extract_rules(&table(), 0.0).unwrap();
        // Two directed rules per pair.
        assert_eq!(rules.len(), 6);

        let rule = rules
            .iter()
            .find(|r| r.antecedent == Itemset::single(1) && r.consequent == Itemset::single(2))
            .unwrap();
        assert_eq!(rule.support, 3);
        assert!((rule.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn threshold_filters_rules() {
        let rules = extract_rules(&table(), 0.8).unwrap();
        assert!(rules.is_empty());

        let rules = extract_rules(&table(), 0.75).unwrap();
        assert_eq!(rules.len(), 6);
    }

    #[test]
    fn missing_antecedent_is_an_error_not_a_skip() {
        // {2,3} is present but {2} is not: the table violates downward
        // closure and extraction must say so.
        let broken = vec![
            (Itemset::single(3), 4),
            (Itemset::new(vec![2, 3]), 3),
        ];
        let err = extract_rules(&broken, 0.5).unwrap_err();
        assert_eq!(
            err,
            RuleError::MissingAntecedent {
                antecedent: Itemset::single(2)
            }
        );
    }

    #[test]
    fn singletons_produce_no_rules() {
        let rules = extract_rules(&[(Itemset::single(9), 5)], 0.0).unwrap();
        assert!(rules.is_empty());
    }
}
