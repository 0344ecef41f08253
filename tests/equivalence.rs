use tapefold::{
    compile, compile_with, encode, parse, FreshNames, Halt, Program, ProgramManager, Rejection,
    Step, TuringMachine, Verdict,
};

const BOUND: usize = 2_000_000;

fn verdict(program: &Program, input: &str, bound: usize) -> Verdict {
    TuringMachine::new(program, input)
        .unwrap()
        .run(Some(bound))
        .verdict()
}

/// Runs `program` and its compiled form on every input and checks both verdicts.
fn assert_equivalent(program: &Program, cases: &[(&str, Verdict)]) {
    let compiled = compile(program).unwrap();
    assert_eq!(compiled.tapes(), 1);

    for &(input, expected) in cases {
        assert_eq!(verdict(program, input, BOUND), expected, "direct on {input:?}");
        assert_eq!(
            verdict(&compiled, input, BOUND),
            expected,
            "compiled on {input:?}"
        );
    }
}

#[test]
fn even_a_agrees_after_compilation() {
    let program = ProgramManager::get_program_by_name("even-a").unwrap();
    assert_equivalent(
        &program,
        &[
            ("", Verdict::Accept),
            ("A", Verdict::Reject),
            ("AA", Verdict::Accept),
            ("AB", Verdict::Reject),
            ("BAB", Verdict::Reject),
            ("AAA", Verdict::Reject),
        ],
    );
}

#[test]
fn balanced_agrees_after_compilation() {
    let program = ProgramManager::get_program_by_name("balanced").unwrap();
    assert_equivalent(
        &program,
        &[
            ("", Verdict::Accept),
            ("ab", Verdict::Accept),
            ("aabb", Verdict::Accept),
            ("aaabbb", Verdict::Accept),
            ("aab", Verdict::Reject),
            ("abb", Verdict::Reject),
            ("ba", Verdict::Reject),
            ("b", Verdict::Reject),
            ("abab", Verdict::Reject),
        ],
    );
}

#[test]
fn append_agrees_after_compilation() {
    let program = ProgramManager::get_program_by_name("append").unwrap();
    assert_equivalent(
        &program,
        &[
            ("", Verdict::Reject),
            ("a", Verdict::Accept),
            ("aa", Verdict::Accept),
            ("aaa", Verdict::Accept),
            ("ab", Verdict::Reject),
        ],
    );
}

#[test]
fn non_halting_machines_keep_running() {
    // Bounces tape 1's head between cells 0 and 1 while tape 2 walks right.
    let program = parse(
        "num-tapes: 2\n\
         input-alphabet: a\n\
         (start) a _ (back) a x > >\n\
         (back) _ _ (start) _ x < >\n",
    )
    .unwrap();
    let compiled = compile(&program).unwrap();

    for bound in [10, 1_000, 50_000] {
        assert_eq!(verdict(&program, "a", bound), Verdict::Running);
        assert_eq!(verdict(&compiled, "a", bound), Verdict::Running);
    }

    // Walks both heads right forever, growing both tapes.
    let program = parse(
        "num-tapes: 2\n\
         input-alphabet: a\n\
         (start) _ _ (start) _ _ > >\n\
         (start) a _ (start) a _ > >\n",
    )
    .unwrap();
    let compiled = compile(&program).unwrap();

    for bound in [10, 1_000, 50_000] {
        assert_eq!(verdict(&program, "aa", bound), Verdict::Running);
        assert_eq!(verdict(&compiled, "aa", bound), Verdict::Running);
    }
}

#[test]
fn tape_two_left_boundary_rejects_on_both_sides() {
    let program = parse(
        "num-tapes: 2\n\
         input-alphabet: a\n\
         (start) a _ (start) a _ > <\n\
         (start) _ _ (accept) _ _ - -\n",
    )
    .unwrap();
    let compiled = compile(&program).unwrap();

    let mut direct = TuringMachine::new(&program, "a").unwrap();
    assert_eq!(
        direct.run(Some(BOUND)),
        Step::Halt(Halt::Reject(Rejection::FellOff { tape: 1 }))
    );
    assert_eq!(verdict(&compiled, "a", BOUND), Verdict::Reject);

    // Without a move on tape 2 the same machine accepts.
    assert_eq!(verdict(&program, "", BOUND), Verdict::Accept);
    assert_eq!(verdict(&compiled, "", BOUND), Verdict::Accept);
}

#[test]
fn tape_one_left_boundary_rejects_on_both_sides() {
    let program = parse(
        "num-tapes: 2\n\
         input-alphabet: a\n\
         (start) a _ (left) a y > >\n\
         (left) _ _ (left) _ _ < -\n\
         (left) a _ (left) a _ < -\n",
    )
    .unwrap();
    let compiled = compile(&program).unwrap();

    let mut direct = TuringMachine::new(&program, "a").unwrap();
    assert_eq!(
        direct.run(Some(BOUND)),
        Step::Halt(Halt::Reject(Rejection::FellOff { tape: 0 }))
    );
    assert_eq!(verdict(&compiled, "a", BOUND), Verdict::Reject);
}

#[test]
fn missing_transition_rejects_on_both_sides() {
    let program = parse(
        "num-tapes: 2\n\
         input-alphabet: a b\n\
         (start) a _ (start) a a > >\n",
    )
    .unwrap();
    assert_equivalent(&program, &[("ab", Verdict::Reject), ("", Verdict::Reject)]);
}

#[test]
fn compiled_programs_survive_serialization() {
    let program = ProgramManager::get_program_by_name("balanced").unwrap();
    let compiled = compile_with(&program, &mut FreshNames::new(42)).unwrap();

    assert_eq!(parse(&encode(&compiled)).unwrap(), compiled);

    let json = serde_json::to_string(&compiled).unwrap();
    let decoded: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, compiled);
}

#[test]
fn compilation_is_reproducible_with_a_seed() {
    let program = ProgramManager::get_program_by_name("append").unwrap();
    let first = compile_with(&program, &mut FreshNames::new(7)).unwrap();
    let second = compile_with(&program, &mut FreshNames::new(7)).unwrap();
    assert_eq!(encode(&first), encode(&second));
}
