use std::time::Instant;

use clap::Parser;
use fiat_shamir_zkp::primitives::crypto::rng::fork;
use fiat_shamir_zkp::{
    batch_verify, ForgerySimulator, Group, KeyPair, MultiProof, Proof, Prover, SchnorrGroup,
    Secp256k1, SecureRng, SimulationConfig, Verifier,
};
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRngCore, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Rounds used by the k-challenge demo.
const DEMO_ROUNDS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "fiat-shamir")]
#[command(about = "Fiat-Shamir Schnorr proofs: demos and forgery simulation", long_about = None)]
#[command(version)]
struct Args {
    /// Round counts to simulate (comma-separated)
    #[arg(long, value_delimiter = ',')]
    k: Vec<usize>,

    /// Forgery attempts per round count
    #[arg(long)]
    trials: Option<u64>,

    /// Bit length of the generated subgroup order
    #[arg(long)]
    bits: Option<u64>,

    /// Context string proofs are bound to
    #[arg(long)]
    context: Option<String>,

    /// Seed for a reproducible run
    #[arg(long, env = "FS_SEED")]
    seed: Option<u64>,

    /// Also run the secp256k1 demo
    #[arg(long)]
    ecc: bool,

    /// Skip the forgery simulation
    #[arg(long)]
    no_sim: bool,

    /// Prove and batch-verify this many proofs over the 128-bit benchmark group
    #[arg(long)]
    batch: Option<usize>,
}

impl Args {
    fn apply(&self, mut config: SimulationConfig) -> SimulationConfig {
        if !self.k.is_empty() {
            config.k_values = self.k.clone();
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(bits) = self.bits {
            config.bits = bits;
        }
        if let Some(context) = &self.context {
            config.context = context.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}

fn demo<G: Group, R: CryptoRngCore>(group: G, context: &str, rng: &mut R) {
    let name = group.name();
    let key_pair = KeyPair::generate(&group, rng);
    let verifier = Verifier::new(group.clone(), key_pair.public().clone(), context.as_bytes());
    let prover = Prover::new(group.clone(), key_pair, context.as_bytes());

    let honest = verifier.verify(&prover.prove(rng));
    let forged = verifier.verify(&Proof::new(
        group.random_element(rng),
        group.random_scalar(rng),
    ));
    println!("=== {name}: single challenge ===");
    println!("honest pass = {honest}");
    println!("forged pass = {forged}");

    let forged_rounds = MultiProof::new(
        (0..DEMO_ROUNDS)
            .map(|_| Proof::<G>::new(group.random_element(rng), group.random_scalar(rng)))
            .collect(),
    );
    let honest_multi = match prover.prove_multi(rng, DEMO_ROUNDS) {
        Ok(proof) => verifier.verify_multi(&proof, DEMO_ROUNDS),
        Err(e) => {
            error!("k-challenge proof failed: {e}");
            false
        }
    };
    let forged_multi = verifier.verify_multi(&forged_rounds, DEMO_ROUNDS);
    println!("=== {name}: k = {DEMO_ROUNDS} challenges ===");
    println!("honest pass = {honest_multi}");
    println!("forged pass = {forged_multi}");
}

fn batch_demo<R: CryptoRngCore>(size: usize, context: &str, rng: &mut R) {
    let group = SchnorrGroup::benchmark_128();

    let start = Instant::now();
    let (proofs, public_keys): (Vec<_>, Vec<_>) = (0..size)
        .map(|_| {
            let key_pair = KeyPair::generate(&group, rng);
            let public_key = key_pair.public().clone();
            let prover = Prover::new(group.clone(), key_pair, context.as_bytes());
            (prover.prove(rng), public_key)
        })
        .unzip();
    let prove_time = start.elapsed();

    let start = Instant::now();
    let accepted = batch_verify(&group, &proofs, &public_keys, context.as_bytes());
    let verify_time = start.elapsed();

    info!(size, ?prove_time, ?verify_time, accepted, "batch verification finished");
    println!("=== batch of {size} ===");
    println!("batch pass = {accepted}");
    println!("prove  {prove_time:?}");
    println!("verify {verify_time:?}");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SimulationConfig::from_env().unwrap_or_else(|e| {
        error!("Failed to load configuration: {e}");
        info!("Using default configuration");
        SimulationConfig::default()
    });
    let config = args.apply(config);

    if let Err(e) = config.validate() {
        return Err(format!("Invalid configuration: {e}").into());
    }

    let mut rng = match config.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => fork(&mut SecureRng::new()),
    };

    let group = SchnorrGroup::generate(config.bits, &mut rng)?;
    info!(
        bits = config.bits,
        p = %group.modulus(),
        q = %group.subgroup_order(),
        g = %group.generator().value(),
        "generated Schnorr group"
    );
    demo(group, &config.context, &mut rng);

    if args.ecc {
        demo(Secp256k1::new(), &config.context, &mut rng);
    }

    if let Some(size) = args.batch {
        batch_demo(size, &config.context, &mut rng);
    }

    if !args.no_sim {
        let simulator = ForgerySimulator::new(config)?;
        println!("=== forgery simulation ({} trials each) ===", simulator.config().trials);
        for report in simulator.run(&mut rng)? {
            println!(
                "k = {:>3}  success = {}/{}  rate = {:.3e}  expected = {:.3e}",
                report.k, report.successes, report.trials, report.success_rate, report.theoretical_rate
            );
        }
    }

    Ok(())
}
