use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tapefold::{
    compile_with, unreachable_states, FreshNames, Halt, Program, ProgramLoader, Step,
    TuringMachine, TuringMachineError,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a machine on an input word and print ACCEPT, REJECT or RUNNING
    Run {
        /// The machine definition file (.tm, or .json)
        program: PathBuf,

        /// The input word, written as a concatenation of input letters
        #[clap(default_value = "")]
        input: String,

        /// Only print the verdict
        #[clap(short, long)]
        quiet: bool,

        /// Give up after this many steps
        #[clap(long)]
        max_steps: Option<usize>,

        /// Compile the machine to one tape before running it
        #[clap(short, long)]
        compile: bool,

        /// Seed for the names minted by --compile
        #[clap(long)]
        seed: Option<u64>,
    },

    /// Compile a one- or two-tape machine into an equivalent one-tape machine
    Compile {
        /// The machine definition file to compile
        input: PathBuf,

        /// Where to write the compiled machine (.json writes JSON)
        output: PathBuf,

        /// Seed for the minted names, for reproducible output
        #[clap(long)]
        seed: Option<u64>,
    },

    /// Validate a machine and report states no transition can reach
    Check {
        /// The machine definition file to check
        program: PathBuf,

        /// Print the machine as JSON instead of a summary
        #[clap(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run {
            program,
            input,
            quiet,
            max_steps,
            compile,
            seed,
        } => run(&program, &input, quiet, max_steps, compile.then_some(seed)),
        Command::Compile {
            input,
            output,
            seed,
        } => compile_file(&input, &output, seed),
        Command::Check { program, json } => check(&program, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn fresh_names(seed: Option<u64>) -> FreshNames {
    seed.map_or_else(FreshNames::from_entropy, FreshNames::new)
}

/// `compile` holds the seed option when the machine should be compiled first.
fn run(
    path: &Path,
    input: &str,
    quiet: bool,
    max_steps: Option<usize>,
    compile: Option<Option<u64>>,
) -> Result<(), TuringMachineError> {
    let mut program = ProgramLoader::load_program(path)?;
    if let Some(seed) = compile {
        program = compile_with(&program, &mut fresh_names(seed))?;
    }

    let mut machine = TuringMachine::new(&program, input)?;

    let outcome = if quiet {
        machine.run(max_steps)
    } else {
        eprint!("Step: 0\n{machine}");
        loop {
            if max_steps.is_some_and(|max| machine.step_count() >= max) {
                break Step::Continue;
            }

            let step = machine.step();
            eprint!("Step: {}\n{machine}", machine.step_count());
            if let Step::Halt(_) = step {
                break step;
            }
        }
    };

    if let (false, Step::Halt(Halt::Reject(reason))) = (quiet, &outcome) {
        eprintln!("{reason}");
    }
    println!("{}", outcome.verdict());

    Ok(())
}

fn compile_file(input: &Path, output: &Path, seed: Option<u64>) -> Result<(), TuringMachineError> {
    let program = ProgramLoader::load_program(input)?;
    let compiled = compile_with(&program, &mut fresh_names(seed))?;
    ProgramLoader::save_program(output, &compiled)?;

    eprintln!(
        "Compiled {} transitions into {} ({} states)",
        program.len(),
        compiled.len(),
        compiled.states().len()
    );
    Ok(())
}

fn check(path: &Path, json: bool) -> Result<(), TuringMachineError> {
    let program = ProgramLoader::load_program(path)?;

    if json {
        let text = serde_json::to_string_pretty(&program)
            .map_err(|e| TuringMachineError::FileError(format!("Failed to encode JSON: {e}")))?;
        println!("{text}");
    } else {
        print_summary(&program);
    }

    for state in unreachable_states(&program) {
        eprintln!("warning: state {state} is never entered");
    }

    Ok(())
}

fn print_summary(program: &Program) {
    let letters = |set: &std::collections::BTreeSet<tapefold::Identifier>| {
        set.iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };

    println!("Tapes: {}", program.tapes());
    println!("Input alphabet: {}", letters(program.input_alphabet()));
    println!("Working alphabet: {}", letters(&program.working_alphabet()));
    println!("States: {}", program.states().len());
    println!("Transitions: {}", program.len());
}
