use color_eyre::eyre::Result;
use dfa_closure::{difference, intersection, parse_alphabet, to_dot, union, DFA, FA};
use tracing_subscriber::EnvFilter;

// Two state parity machine over {0, 1}: flips on `counted`, accepts when the parity is `accept_even`.
fn parity(counted: char, accept_even: bool) -> Result<DFA<&'static str>> {
    let dfa = DFA::new(
        ["even", "odd"].into_iter().collect(),
        parse_alphabet(["0", "1"])?,
        move |state: &&'static str, symbol| match (*state, symbol == counted) {
            ("even", true) => "odd",
            ("odd", true) => "even",
            (state, false) => state,
            _ => "even",
        },
        "even",
        [if accept_even { "even" } else { "odd" }]
            .into_iter()
            .collect(),
    )?;
    Ok(dfa)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let even_ones = parity('1', true)?;
    let even_zeros = parity('0', true)?;
    let odd_zeros = parity('0', false)?;
    let odd_ones = parity('1', false)?;

    let everything = DFA::new(
        ["q0"].into_iter().collect(),
        parse_alphabet(["0", "1"])?,
        |_: &&'static str, _| "q0",
        "q0",
        ["q0"].into_iter().collect(),
    )?;

    let input = "0001011011";

    let odd_either = union(&odd_zeros, &odd_ones)?;
    println!(
        "odd 0s or odd 1s accepts {:?}: {}",
        input,
        odd_either.simulate(input)?
    );

    let even_both = intersection(&even_ones, &even_zeros)?;
    for input in ["0011", "100"] {
        println!(
            "even 0s and even 1s accepts {:?}: {}",
            input,
            even_both.simulate(input)?
        );
    }

    let odd_ones_only = difference(&everything, &even_ones)?;
    println!(
        "all strings minus even 1s accepts {:?}: {}",
        input,
        odd_ones_only.simulate(input)?
    );

    let chained = union(&odd_either, &even_both)?;
    println!(
        "chained union has {} states, {} reachable",
        chained.get_num_states(),
        chained.tabulate().get_num_states()
    );

    println!("{}", to_dot(&odd_ones_only));

    Ok(())
}
