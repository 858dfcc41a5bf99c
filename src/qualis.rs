//! Composite "Qualis" tier derivation.
//!
//! The classification is a pure, total function over four inputs: ABDC rating,
//! ABS rating, JCR quartile and SJR quartile. Rules are evaluated in strict
//! precedence; the first match wins and missing fields simply fail their
//! disjuncts. Since unified records are immutable after the merge, the tier is
//! computed once at merge time and stored - recomputing always agrees.

use crate::model::{Quartile, Qualis, UnifiedJournal};

/// Derive the Qualis tier from the four classifiable fields.
///
/// 1. MB: ABDC in {A*, A} OR ABS in {2,3,4,4*} OR JCR Q1 OR SJR Q1
/// 2. B:  ABDC B OR ABS 1 OR JCR Q2 OR SJR Q2
/// 3. R:  ABDC C OR JCR Q3 OR SJR Q3
/// 4. F:  JCR Q4 OR SJR Q4
/// 5. Otherwise unrated ("-")
pub fn compute_qualis(
    abdc: Option<&str>,
    abs: Option<&str>,
    jcr_quartile: Option<Quartile>,
    sjr_quartile: Option<Quartile>,
) -> Qualis {
    if matches!(abdc, Some("A*") | Some("A"))
        || matches!(abs, Some("2") | Some("3") | Some("4") | Some("4*"))
        || jcr_quartile == Some(Quartile::Q1)
        || sjr_quartile == Some(Quartile::Q1)
    {
        return Qualis::Mb;
    }

    if abdc == Some("B")
        || abs == Some("1")
        || jcr_quartile == Some(Quartile::Q2)
        || sjr_quartile == Some(Quartile::Q2)
    {
        return Qualis::B;
    }

    if abdc == Some("C") || jcr_quartile == Some(Quartile::Q3) || sjr_quartile == Some(Quartile::Q3) {
        return Qualis::R;
    }

    if jcr_quartile == Some(Quartile::Q4) || sjr_quartile == Some(Quartile::Q4) {
        return Qualis::F;
    }

    Qualis::Unrated
}

/// Re-derive the tier from a unified record's own fields.
///
/// Equal to the stored `qualis` by construction; used to assert that invariant.
pub fn recompute(journal: &UnifiedJournal) -> Qualis {
    compute_qualis(
        journal.abdc.as_deref(),
        journal.abs.as_deref(),
        journal.jcr_quartile(),
        journal.sjr_quartile(),
    )
}
