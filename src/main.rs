//! Trains a character-level GPT on the configured corpus and prints samples.
//!
//! Settings come from `SCALAR_GPT_*` environment variables; progress goes
//! through `log` (set `RUST_LOG=info` to see it).

use scalar_gpt::config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = config::from_env()?;
    log::debug!("{config:?}");
    let report = scalar_gpt::run(&config)?;

    println!(
        "trained {} params on {} docs (vocab {}), final loss {:.4}",
        report.num_params, report.num_docs, report.vocab_size, report.final_loss
    );
    println!("\n--- inference (new, hallucinated samples) ---");
    for (i, sample) in report.samples.iter().enumerate() {
        println!("sample {:2}: {sample}", i + 1);
    }
    Ok(())
}
