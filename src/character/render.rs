//! Text and JSON presentation of a Character

use std::fmt::Write;

use crate::character::assembler::Character;
use crate::character::attribute::format_value;
use crate::config::BudgetUnit;
use crate::error::Result;

fn format_amount(unit: BudgetUnit, amount: i32) -> String {
    match unit {
        BudgetUnit::Points => amount.to_string(),
        BudgetUnit::Money => format!("${}", amount),
    }
}

/// Render a plain-text character sheet
pub fn render_text(character: &Character) -> String {
    let mut out = String::with_capacity(1024);
    let d = &character.derived;

    // Writing into a String cannot fail
    let _ = writeln!(out, "{} [{} points]", character.template, character.total_points);
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "ST {}  DX {}  IQ {}  HT {}",
        d.st, d.dx, d.iq, d.ht
    );
    let _ = writeln!(
        out,
        "HP {}  Will {}  Per {}  FP {}",
        d.hp, d.will, d.per, d.fp
    );
    let _ = writeln!(
        out,
        "Basic Speed {}  Basic Move {}",
        format_value(d.basic_speed),
        d.basic_move
    );
    let _ = writeln!(
        out,
        "Basic Lift {} lbs  Encumbrance {} ({} lbs carried)",
        format_value(d.basic_lift),
        d.encumbrance,
        format_value(d.equipment_weight)
    );
    let _ = writeln!(out);

    for entry in &character.traits {
        let _ = writeln!(out, "{} [{}]", entry.name, entry.cost);
    }

    for category in character
        .categories
        .iter()
        .filter(|c| c.unit == BudgetUnit::Money && !c.picks.is_empty())
    {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", category.category);
        for pick in &category.picks {
            if pick.lbs > 0.0 {
                let _ = writeln!(
                    out,
                    "  {} (${}, {} lbs)",
                    pick.name,
                    pick.cost,
                    format_value(pick.lbs)
                );
            } else {
                let _ = writeln!(out, "  {} (${})", pick.name, pick.cost);
            }
        }
    }

    let _ = writeln!(out);
    for category in &character.categories {
        let spent = format_amount(category.unit, category.spent);
        match category.allocation {
            Some(allocation) => {
                let _ = writeln!(
                    out,
                    "{}: {} / {}",
                    category.category,
                    spent,
                    format_amount(category.unit, allocation)
                );
            }
            None => {
                let _ = writeln!(out, "{}: {}", category.category, spent);
            }
        }
    }

    out
}

/// Render the full Character, every pick included, as pretty JSON
pub fn render_json(character: &Character) -> Result<String> {
    Ok(serde_json::to_string_pretty(character)?)
}
