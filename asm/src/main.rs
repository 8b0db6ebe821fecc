use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::process::ExitCode;

use color_print::{cformat, cprintln};

use asm430::srec::SrecWriter;
use asm430::Assembler;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.asm")]
    input: String,

    /// Output S-record file
    #[clap(short, long, default_value = "main.s19")]
    output: String,

    /// Listing file
    #[clap(short, long, default_value = "main.lis")]
    listing: String,

    /// Dump the symbol table to the console
    #[clap(short, long)]
    dump: bool,
}

fn main() -> ExitCode {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("MSP430 Assembler");

    println!("1. Read Lines and Build Records");
    println!("  < {}", args.input);
    let input = File::open(&args.input)
        .expect(&cformat!("<r,s>Failed to open file</>: {}", args.input));
    let listing = File::create(&args.listing)
        .expect(&cformat!("<r,s>Failed to create file</>: {}", args.listing));

    let mut assembler = Assembler::new(BufWriter::new(listing));
    assembler
        .first_pass(BufReader::new(input))
        .expect(&cformat!("<r,s>Failed to read file</>: {}", args.input));
    assembler.dump_symbols();
    if args.dump {
        let _ = assembler.symbols.dump(&mut std::io::stdout());
    }

    println!("2. Encode Records and Emit S-Records");
    println!("  > {}", args.output);
    if assembler.clear_for_second_pass() {
        let output = File::create(&args.output)
            .expect(&cformat!("<r,s>Failed to create file</>: {}", args.output));
        let mut wtr = BufWriter::new(output);
        let mut srec = SrecWriter::new(&mut wtr);
        assembler
            .second_pass(&mut srec)
            .expect(&cformat!("<r,s>Failed to write file</>: {}", args.output));
        wtr.flush()
            .expect(&cformat!("<r,s>Failed to write file</>: {}", args.output));
    }

    if assembler.diags.is_empty() {
        ExitCode::SUCCESS
    } else {
        for diag in &assembler.diags {
            cprintln!("<r,s>line {}</>: {}", diag.line, diag.error);
        }
        cprintln!("<r,s>{} error(s)</>", assembler.diags.len());
        ExitCode::FAILURE
    }
}
