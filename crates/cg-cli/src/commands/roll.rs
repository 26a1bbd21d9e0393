use cg_mechanics::DiceNotation;
use colored::Colorize;

/// Resolve `<SIDES> [TIMES]` into a die size and dice count.
fn resolve_dice(sides: &str, times: Option<u32>) -> Result<(u32, u32), String> {
    if let Ok(sides) = sides.trim().parse::<u32>() {
        return Ok((sides, times.unwrap_or(1)));
    }
    let notation = DiceNotation::from_str_tag(sides)
        .ok_or_else(|| format!("invalid dice '{sides}', expected a number or notation like 4d6"))?;
    if times.is_some() {
        return Err(format!(
            "dice count given twice: '{sides}' already rolls {} dice",
            notation.count
        ));
    }
    Ok((notation.sides, notation.count))
}

pub fn run(
    sides: &str,
    times: Option<u32>,
    options: &[String],
    ctx_ref: &str,
    seed: Option<u64>,
    audit: bool,
    json: bool,
) -> Result<(), String> {
    let (sides, times) = resolve_dice(sides, times)?;
    let roll = super::roller(seed, audit)
        .perform_roll(sides, times, ctx_ref, options)
        .map_err(|e| e.to_string())?;

    if json {
        return super::print_json(&roll);
    }

    let label = DiceNotation { count: times, sides }.to_string();
    let options = roll.options().trim_end();
    if options.is_empty() {
        println!("  {}", label.bold());
    } else {
        println!("  {} {}", label.bold(), format!("({options})").dimmed());
    }
    println!("  {roll}");
    println!("  Result: {}", roll.result().to_string().green().bold());

    Ok(())
}
