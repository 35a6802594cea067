//! Derived statistics (GURPS Basic Set rules)

use serde::Serialize;
use std::fmt;

use crate::character::attribute::Attribute;
use crate::character::pick::ResolvedPick;
use crate::character::state::TraitState;

/// Encumbrance level from carried weight against Basic Lift
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Encumbrance {
    None,
    Light,
    Medium,
    Heavy,
    ExtraHeavy,
    Overloaded,
}

impl Encumbrance {
    /// Upper bounds as multiples of Basic Lift
    const THRESHOLDS: [(f64, Encumbrance); 5] = [
        (1.0, Encumbrance::None),
        (2.0, Encumbrance::Light),
        (3.0, Encumbrance::Medium),
        (6.0, Encumbrance::Heavy),
        (10.0, Encumbrance::ExtraHeavy),
    ];

    pub fn from_load(carried: f64, basic_lift: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(multiple, _)| carried <= multiple * basic_lift)
            .map(|(_, level)| *level)
            .unwrap_or(Encumbrance::Overloaded)
    }
}

impl fmt::Display for Encumbrance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Encumbrance::None => "None",
            Encumbrance::Light => "Light",
            Encumbrance::Medium => "Medium",
            Encumbrance::Heavy => "Heavy",
            Encumbrance::ExtraHeavy => "Extra-Heavy",
            Encumbrance::Overloaded => "Overloaded",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedStats {
    pub st: i32,
    pub dx: i32,
    pub iq: i32,
    pub ht: i32,
    pub hp: i32,
    pub will: i32,
    pub per: i32,
    pub fp: i32,
    pub basic_speed: f64,
    pub basic_move: i32,
    pub basic_lift: f64,
    pub equipment_weight: f64,
    pub encumbrance: Encumbrance,
}

/// ST²/5, rounded once it reaches 10 lbs
pub fn basic_lift(st: f64) -> f64 {
    let lift = st * st / 5.0;
    if lift >= 10.0 {
        lift.round()
    } else {
        lift
    }
}

/// Compute derived stats; `picks` supplies carried equipment weight
pub fn derive_stats<'a>(
    state: &TraitState,
    picks: impl IntoIterator<Item = &'a ResolvedPick>,
) -> DerivedStats {
    let score = |attr: Attribute| state.attribute(attr).floor() as i32;

    let st = state.attribute(Attribute::St);
    let lift = basic_lift(st);
    let equipment_weight: f64 = picks.into_iter().map(|p| p.lbs).sum();

    DerivedStats {
        st: score(Attribute::St),
        dx: score(Attribute::Dx),
        iq: score(Attribute::Iq),
        ht: score(Attribute::Ht),
        hp: score(Attribute::Hp),
        will: score(Attribute::Will),
        per: score(Attribute::Per),
        fp: score(Attribute::Fp),
        basic_speed: state.attribute(Attribute::BasicSpeed),
        basic_move: score(Attribute::BasicMove),
        basic_lift: lift,
        equipment_weight,
        encumbrance: Encumbrance::from_load(equipment_weight, lift),
    }
}
