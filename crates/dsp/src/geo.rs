//! Geo-target expansion — free-form geographic input to atomic targets.

use campaign_core::campaign::Targeting;
use campaign_core::targeting::GeoTarget;

/// Expand the operator's geographic input into ordered targeting units.
///
/// Postal codes come first, then DMAs, each in input order. Tokens are
/// taken literally: repeated tokens yield repeated targets. With no usable
/// tokens the result is a single country-level target.
pub fn expand(targeting: &Targeting) -> Vec<GeoTarget> {
    let mut targets: Vec<GeoTarget> = tokens(&targeting.geo_input.postal_codes)
        .map(GeoTarget::postal_code)
        .collect();
    targets.extend(tokens(&targeting.geo_input.dmas).map(GeoTarget::dma));

    if targets.is_empty() {
        targets.push(GeoTarget::country(&targeting.country));
    }
    targets
}

fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::campaign::GeoInput;
    use campaign_core::targeting::GeoKind;
    use proptest::prelude::*;

    fn targeting(postal_codes: &str, dmas: &str) -> Targeting {
        Targeting {
            geo_input: GeoInput {
                postal_codes: postal_codes.to_string(),
                dmas: dmas.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let targets = expand(&targeting("90210, 90210 ,10001", ""));
        let values: Vec<_> = targets.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["90210", "90210", "10001"]);
        assert!(targets.iter().all(|t| t.kind == GeoKind::PostalCode));
    }

    #[test]
    fn test_dmas_follow_postal_codes() {
        let targets = expand(&targeting("10001", "New York, Los Angeles"));
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].kind, GeoKind::PostalCode);
        assert_eq!(targets[0].display_name, "ZIP 10001");
        assert_eq!(targets[1].kind, GeoKind::Dma);
        assert_eq!(targets[2].display_name, "Los Angeles");
    }

    #[test]
    fn test_empty_input_falls_back_to_country() {
        let mut t = targeting("", "");
        t.country = "CA".into();
        let targets = expand(&t);
        assert_eq!(targets, vec![GeoTarget::country("CA")]);
    }

    #[test]
    fn test_separator_only_input_falls_back_to_country() {
        let targets = expand(&targeting(" , ,, ", ","));
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].kind, GeoKind::Country);
        assert_eq!(targets[0].value, "US");
    }

    proptest! {
        #[test]
        fn prop_one_target_per_nonempty_token(
            codes in proptest::collection::vec("[0-9]{5}", 1..12),
            pads in proptest::collection::vec(" {0,3}", 12),
        ) {
            let raw = codes
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}{}{}", pads[i], c, pads[11 - i]))
                .collect::<Vec<_>>()
                .join(",");

            let targets = expand(&targeting(&raw, ""));
            let values: Vec<String> = targets.iter().map(|t| t.value.clone()).collect();
            prop_assert_eq!(values, codes);
        }

        #[test]
        fn prop_never_empty(postal in "[0-9, ]{0,20}", dmas in "[A-Za-z, ]{0,20}") {
            let targets = expand(&targeting(&postal, &dmas));
            prop_assert!(!targets.is_empty());
            let has_country = targets.iter().any(|t| t.kind == GeoKind::Country);
            prop_assert_eq!(has_country, targets.len() == 1 && targets[0].kind == GeoKind::Country);
        }
    }
}
