use anyhow::Result;

use faveicon_core::TweenSequence;

pub fn run(from: f64, to: f64, duration: f64, json: bool) -> Result<()> {
    let sequence = TweenSequence::generate(from, to, duration);

    if json {
        println!("{}", sequence.to_json()?);
        return Ok(());
    }

    if sequence.is_empty() {
        println!("No keyframes: duration must be positive (got {}).", duration);
        return Ok(());
    }

    println!(
        "Keyframes {} -> {} over {}s ({} frames):\n",
        from,
        to,
        duration,
        sequence.len()
    );
    for (index, value) in sequence.values().iter().enumerate() {
        println!("  {:>3}  t={:.4}  {:.6}", index, sequence.time_at(index), value);
    }

    Ok(())
}
