use chain_hash::FoldHash;
use chain_hash::GoldenRatio;
use chain_hash::HashFunction;
use chain_hash::HashTable;
use chain_hash::TableError;
use clap::Parser;
use clap::ValueEnum;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Hash {
    Golden,
    Fold,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: i32,

    /// Distance between consecutive keys.
    #[arg(short = 's', long = "stride", default_value_t = 1)]
    stride: i32,

    #[arg(long = "hash", value_enum, default_value_t = Hash::Golden)]
    hash: Hash,
}

fn run<H: HashFunction>(args: &Args, hash_fn: H) -> Result<(), TableError> {
    let mut table = HashTable::with_hash_fn(hash_fn);

    println!("Filling table with {} keys (stride {})...", args.entries, args.stride);
    for i in 0..args.entries {
        table.insert(i.wrapping_mul(args.stride), i);
    }

    println!("Inserted {} entries into {} buckets", table.len(), table.capacity());
    table.chain_histogram().print();
    table.chain_stats().print();

    println!("Removing the first 7/8 of the keys...");
    for i in 0..args.entries - args.entries / 8 {
        table.remove(i.wrapping_mul(args.stride))?;
    }

    println!("{} entries left in {} buckets", table.len(), table.capacity());
    table.chain_histogram().print();
    table.chain_stats().print();

    Ok(())
}

fn main() -> Result<(), TableError> {
    env_logger::init();
    let args = Args::parse();

    match args.hash {
        Hash::Golden => run(&args, GoldenRatio),
        Hash::Fold => run(&args, FoldHash::with_seed(0x9e37_79b9)),
    }
}
