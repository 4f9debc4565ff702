//! Tests for the anatomical data model
//!
//! Invariants of the model types: non-negative measures, fixed laminar
//! vocabulary, population naming.

use corticonv_structures::*;
use proptest::prelude::*;

#[cfg(test)]
mod test_measures {
    use super::*;

    proptest! {
        #[test]
        fn flne_accepts_exactly_non_negative_finite(value in prop::num::f64::ANY) {
            let accepted = Flne::new(value).is_ok();
            prop_assert_eq!(accepted, value.is_finite() && value >= 0.0);
        }

        #[test]
        fn population_count_scales_with_extent(density in 0.0f64..1e6, extent in 0.0f64..5e3) {
            let mut area = CorticalArea::new(AreaId::new("MT").unwrap(), extent).unwrap();
            area.add_layer_density(CorticalLayer::L5, density).unwrap();
            let n = area.layer_neuron_count(CorticalLayer::L5).unwrap();
            prop_assert!(n >= 0.0);
            prop_assert!((n - density * extent).abs() <= 1e-9 * (1.0 + n));
        }
    }
}

#[cfg(test)]
mod test_laminar {
    use super::*;

    #[test]
    fn test_every_shorthand_stays_in_vocabulary() {
        for code in ["S", "I", "B"] {
            let set = LaminarPattern::parse_origin(code).unwrap();
            assert!(!set.is_empty());
            assert!(set.iter().all(|l| CorticalLayer::ALL.contains(&l)));
        }
        for code in ["F", "M", "C"] {
            let set = LaminarPattern::parse_termination(code).unwrap();
            assert!(!set.is_empty());
        }
    }

    #[test]
    fn test_unknown_codes_are_errors() {
        let err = LaminarPattern::parse("X", "F").unwrap_err();
        assert!(matches!(err, StructuresError::UnknownLaminarCode(_)));
        assert!(LaminarPattern::parse("S", "L4;L9").is_err());
    }

    #[test]
    fn test_connection_with_pattern_serializes() {
        let record = ConnectionRecord::new(
            AreaId::new("V1").unwrap(),
            AreaId::new("V2").unwrap(),
            Flne::new(0.6).unwrap(),
            LaminarPattern::parse("S", "F").unwrap(),
        )
        .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source"], "V1");
        assert_eq!(json["laminar"]["termination"][0], "4");
    }
}

#[cfg(test)]
mod test_parcellation {
    use super::*;

    #[test]
    fn test_membership() {
        let parcellation = Parcellation::new("FV91")
            .with_areas(["V1", "V2", "V4"].iter().map(|a| AreaId::new(a).unwrap()));
        assert_eq!(parcellation.len(), 3);
        assert!(parcellation.contains(&AreaId::new("V4").unwrap()));
        assert!(!parcellation.contains(&AreaId::new("MT").unwrap()));
    }
}
