//! # scalar-gpt
//!
//! A character-level GPT trained and sampled one scalar at a time.
//!
//! Every number in the network is an [`autograd::ValueRef`] node; the forward
//! pass builds the graph, `backward()` walks it, and Adam updates the
//! parameter leaves in place. There is no tensor engine and no batching.
//!
//! [`run`] wires the pieces together: load a corpus, build a vocabulary,
//! train for the configured number of steps, then sample.

pub mod autograd;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod nn;
pub mod rng;
pub mod sample;
pub mod tokenizer;
pub mod train;

use rand::rngs::StdRng;
use rand::SeedableRng;

use config::Config;
use data::load_from_path;
use model::Gpt;
use tokenizer::{CharTokenizer, Tokenizer};
use train::Trainer;

pub use error::Error;

/// What a finished [`run`] produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Non-blank lines in the corpus.
    pub num_docs: usize,
    /// Distinct characters plus BOS.
    pub vocab_size: usize,
    /// Scalar weights across every matrix.
    pub num_params: usize,
    /// Loss of the last training step.
    pub final_loss: f64,
    /// Decoded generations, BOS stripped.
    pub samples: Vec<String>,
}

/// Loads, trains and samples according to `config`.
///
/// A single `StdRng` seeded from `config.seed` drives document shuffling,
/// weight init and sampling, so equal configs give equal reports.
///
/// # Errors
///
/// Any [`Error`] raised along the way; a step with a non-finite loss ends
/// the run.
pub fn run(config: &Config) -> Result<RunReport, Error> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut corpus = load_from_path(&config.input_path)?;
    corpus.shuffle(&mut rng);
    log::info!("num docs: {}", corpus.len());

    let tokenizer = CharTokenizer::from_documents(corpus.documents());
    let docs = corpus
        .documents()
        .iter()
        .map(|d| tokenizer.encode(d))
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("vocab size: {}", tokenizer.vocab_size());

    let model = Gpt::new(config.model(tokenizer.vocab_size()), &mut rng)?;
    let num_params = model.store().num_params();
    log::info!("num params: {num_params}");

    let mut trainer = Trainer::new(model, config.adam(), config.num_steps)?;
    let mut final_loss = f64::NAN;
    for step in 0..config.num_steps {
        let doc = &docs[step % docs.len()];
        final_loss = trainer.train_step(doc)?;
        if (step + 1) % config.loss_log_every == 0 || step + 1 == config.num_steps {
            log::info!(
                "step {:4} / {:4} | loss {final_loss:.4}",
                step + 1,
                config.num_steps
            );
        }
    }

    let model = trainer.into_model();
    let block_size = model.config().block_size;
    let mut samples = Vec::with_capacity(config.sample_size);
    for _ in 0..config.sample_size {
        let ids = sample::generate(&model, block_size, config.temperature, &mut rng)?;
        samples.push(tokenizer.decode(&ids)?);
    }

    Ok(RunReport {
        num_docs: corpus.len(),
        vocab_size: tokenizer.vocab_size(),
        num_params,
        final_loss,
        samples,
    })
}
