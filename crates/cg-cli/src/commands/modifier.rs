use cg_mechanics::ability_modifier;

pub fn run(score: i32) -> Result<(), String> {
    println!("{}", super::signed(ability_modifier(score)));
    Ok(())
}
