//! Dosage-form heuristics for the medicine card.
//!
//! Infers a display category from the route of administration and the
//! medicine name. Keyword checks run in a fixed precedence order; the
//! first match wins.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DosageForm {
    Oral,
    Liquid,
    EyeDrops,
    EarDrops,
    Topical,
    Injection,
    Inhaled,
    Suppository,
    Unknown,
}

impl DosageForm {
    pub fn infer(route: Option<&str>, name: Option<&str>) -> Self {
        let r = route.unwrap_or_default().to_lowercase();
        let n = name.unwrap_or_default().to_lowercase();
        let route_has = |keys: &[&str]| keys.iter().any(|k| r.contains(k));
        let name_has = |keys: &[&str]| keys.iter().any(|k| n.contains(k));

        if route_has(&["oral", "tablet", "capsule"]) || name_has(&["tablet", "pill", "capsule"]) {
            return DosageForm::Oral;
        }
        if route_has(&["liquid", "syrup", "drops"]) || name_has(&["syrup", "solution", "elixir"]) {
            if route_has(&["eye", "ophthalmic"]) {
                return DosageForm::EyeDrops;
            }
            if route_has(&["ear", "otic"]) {
                return DosageForm::EarDrops;
            }
            return DosageForm::Liquid;
        }
        if route_has(&["topical", "cream", "ointment", "gel"])
            || name_has(&["cream", "ointment", "gel"])
        {
            return DosageForm::Topical;
        }
        if route_has(&["injection", "injectable"]) || name_has(&["injection"]) {
            return DosageForm::Injection;
        }
        if route_has(&["inhalation", "inhaler"]) || name_has(&["inhaler", "spray"]) {
            return DosageForm::Inhaled;
        }
        if route_has(&["suppository"]) {
            return DosageForm::Suppository;
        }
        DosageForm::Unknown
    }

    /// Short label for terminal rendering.
    pub fn label(self) -> &'static str {
        match self {
            DosageForm::Oral => "pill",
            DosageForm::Liquid => "liquid",
            DosageForm::EyeDrops => "eye drops",
            DosageForm::EarDrops => "ear drops",
            DosageForm::Topical => "topical",
            DosageForm::Injection => "injection",
            DosageForm::Inhaled => "inhaled",
            DosageForm::Suppository => "suppository",
            DosageForm::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_keywords_pick_form() {
        assert_eq!(DosageForm::infer(Some("Orally"), None), DosageForm::Oral);
        assert_eq!(DosageForm::infer(Some("Topical"), Some("Hydrocortisone")), DosageForm::Topical);
        assert_eq!(DosageForm::infer(Some("IM injection"), None), DosageForm::Injection);
        assert_eq!(DosageForm::infer(Some("rectal suppository"), None), DosageForm::Suppository);
    }

    #[test]
    fn drops_split_by_site() {
        assert_eq!(DosageForm::infer(Some("eye drops"), None), DosageForm::EyeDrops);
        assert_eq!(DosageForm::infer(Some("ear drops"), None), DosageForm::EarDrops);
        assert_eq!(DosageForm::infer(Some("drops"), None), DosageForm::Liquid);
        assert_eq!(DosageForm::infer(None, Some("Cough Syrup")), DosageForm::Liquid);
    }

    #[test]
    fn name_keywords_apply_without_route() {
        assert_eq!(DosageForm::infer(None, Some("Salbutamol Inhaler")), DosageForm::Inhaled);
        assert_eq!(DosageForm::infer(None, Some("Paracetamol Tablet")), DosageForm::Oral);
    }

    #[test]
    fn oral_takes_precedence_over_later_matches() {
        assert_eq!(DosageForm::infer(Some("oral"), Some("gel capsule")), DosageForm::Oral);
    }

    #[test]
    fn nothing_matches_unknown() {
        assert_eq!(DosageForm::infer(None, None), DosageForm::Unknown);
        assert_eq!(DosageForm::infer(Some("as directed"), Some("Amoxicillin")), DosageForm::Unknown);
    }
}
