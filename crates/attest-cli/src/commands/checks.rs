//! `attest checks` — List the check vocabulary.

use clap::Args;

use attest_core::{CheckCategory, CheckId};

#[derive(Args, Debug)]
pub struct ChecksArgs {
    /// Print names only, one per line, in report order.
    #[arg(long)]
    pub plain: bool,
}

const CATEGORIES: [CheckCategory; 6] = [
    CheckCategory::Binding,
    CheckCategory::Registry,
    CheckCategory::Certificate,
    CheckCategory::Disclosure,
    CheckCategory::Proof,
    CheckCategory::Sanctions,
];

pub fn run(args: &ChecksArgs) -> anyhow::Result<()> {
    if args.plain {
        for check in CheckId::ALL {
            println!("{check}");
        }
        return Ok(());
    }

    for category in CATEGORIES {
        println!("{category}:");
        for check in CheckId::ALL.iter().filter(|c| c.category() == category) {
            println!("  {check}");
        }
    }
    Ok(())
}
