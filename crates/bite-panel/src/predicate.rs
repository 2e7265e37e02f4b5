//! Domestic/foreign classification of establishments.

use crate::error::{PanelError, Result};
use bite_spatial::ReferenceZoneSet;
use polars::prelude::*;

/// Name of the foreign flag column: 0 for domestic, 1 for foreign.
pub const FOREIGN_COLUMN: &str = "foreign";

/// Decides whether an establishment is domestic from its UI-address zone.
pub trait DomesticPredicate {
    /// Fail early when the predicate cannot classify anything.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// True when the establishment counts as domestic.
    fn is_domestic(&self, ui_zone: Option<&str>) -> bool;
}

impl DomesticPredicate for ReferenceZoneSet {
    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(PanelError::MissingReferenceZones);
        }
        Ok(())
    }

    /// Membership in the reference territory. Missing codes are foreign.
    fn is_domestic(&self, ui_zone: Option<&str>) -> bool {
        ui_zone.is_some_and(|zone| self.contains(zone))
    }
}

/// Add the [`FOREIGN_COLUMN`] flag computed from `ui_addr_5_zip`.
pub fn flag_foreign<P: DomesticPredicate + ?Sized>(
    mut df: DataFrame,
    predicate: &P,
) -> Result<DataFrame> {
    let flags: Vec<i32> = df
        .column("ui_addr_5_zip")?
        .str()?
        .into_iter()
        .map(|zone| i32::from(!predicate.is_domestic(zone)))
        .collect();

    let flag_col: Column = Series::new(FOREIGN_COLUMN.into(), flags).into();
    df.with_column(flag_col)?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ReferenceZoneSet {
        ["00601", "00602"].into_iter().collect()
    }

    #[test]
    fn test_membership() {
        let set = reference();
        assert!(set.is_domestic(Some("00601")));
        assert!(!set.is_domestic(Some("33101")));
        assert!(!set.is_domestic(None));
    }

    #[test]
    fn test_empty_reference_set_is_rejected() {
        let err = ReferenceZoneSet::default().validate().unwrap_err();
        assert!(matches!(err, PanelError::MissingReferenceZones));
        assert!(reference().validate().is_ok());
    }

    #[test]
    fn test_flag_column() {
        let df = df!("ui_addr_5_zip" => [Some("00601"), Some("33101"), None]).unwrap();
        let flagged = flag_foreign(df, &reference()).unwrap();
        let flags: Vec<Option<i32>> = flagged
            .column(FOREIGN_COLUMN)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(flags, vec![Some(0), Some(1), Some(1)]);
    }

    struct Everyone;

    impl DomesticPredicate for Everyone {
        fn is_domestic(&self, _ui_zone: Option<&str>) -> bool {
            true
        }
    }

    #[test]
    fn test_custom_predicate() {
        let df = df!("ui_addr_5_zip" => [Some("33101"), None]).unwrap();
        let flagged = flag_foreign(df, &Everyone).unwrap();
        let flags = flagged.column(FOREIGN_COLUMN).unwrap().i32().unwrap();
        assert_eq!(flags.sum(), Some(0));
    }
}
