use asm430::assemble;
use asm430::error::AsmError;
use asm430::symbol::SymKind;

fn assemble_clean(source: &str) -> String {
    let out = assemble(source).unwrap();
    assert!(out.diags.is_empty(), "diags: {:?}", out.diags);
    out.srec
}

/// Data words collected from every S1 record, little-endian pairs.
fn data_words(srec: &str) -> Vec<u16> {
    let mut words = Vec::new();
    for line in srec.lines().filter(|l| l.starts_with("S1")) {
        let data = &line[8..line.len() - 2];
        let bytes: Vec<u8> = (0..data.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&data[i..i + 2], 16).unwrap())
            .collect();
        for pair in bytes.chunks(2) {
            words.push(pair[0] as u16 | (pair[1] as u16) << 8);
        }
    }
    words
}

#[test]
fn counting_loop() {
    let srec = assemble_clean(
        "LOOP: MOV #0, R5\n      ADD #1, R5\n      JMP LOOP\n      END LOOP\n",
    );
    let lines: Vec<&str> = srec.lines().collect();
    assert_eq!(lines, vec!["S109000005431553FD3F0A", "S9030000FC"]);
    // back-edge offset is negative and even
    let words = data_words(&srec);
    assert_eq!(words, vec![0x4305, 0x5315, 0x3FFD]);
}

#[test]
fn forward_reference_is_transparent() {
    let out = assemble("MOV #0, TARGET\nTARGET: WORD 5\n").unwrap();
    assert!(out.diags.is_empty(), "diags: {:?}", out.diags);
    let sym = out.symbols.get("TARGET").unwrap();
    assert_eq!(sym.value, 4);
    assert_eq!(sym.kind, SymKind::Label);
    assert_eq!(out.srec.lines().next().unwrap(), "S10900008043020005002C");

    // the same distances come out when the label is defined first
    let early = assemble("TARGET: WORD 5\nMOV #0, TARGET\n").unwrap();
    assert!(early.diags.is_empty());
    let words = data_words(&early.srec);
    // ext = 0 - (2 + 2) wrapped to u16
    assert_eq!(words, vec![5, 0x4380, 0u16.wrapping_sub(4)]);
}

#[test]
fn literal_destination_blocks_pass_two() {
    let out = assemble("MOV R4, #5\n").unwrap();
    assert_eq!(out.diags.len(), 1);
    assert_eq!(out.diags[0].error, AsmError::InvalidDestination);
    assert!(out.srec.is_empty());
}

#[test]
fn jump_distance_boundaries() {
    // forward limit is exclusive at 1024
    let out = assemble("JMP FWD\nORG 1026\nFWD: RETI\n").unwrap();
    assert!(matches!(out.diags[0].error, AsmError::JumpOutOfRange(1024)));

    let out = assemble("JMP FWD\nORG 1024\nFWD: RETI\n").unwrap();
    assert!(out.diags.is_empty());

    // backward limit hits at -1022
    let out = assemble("BACK: RETI\nORG 1020\nJMP BACK\n").unwrap();
    assert!(matches!(out.diags[0].error, AsmError::JumpOutOfRange(-1022)));

    let out = assemble("BACK: RETI\nORG 1018\nJMP BACK\n").unwrap();
    assert!(out.diags.is_empty());

    // odd distances never encode
    let out = assemble("JMP ODD\nBYTE 1\nODD: RETI\n").unwrap();
    assert!(matches!(out.diags[0].error, AsmError::OddJumpDistance(1)));
}

#[test]
fn location_counter_capacity() {
    // a word at $FFFE would run the LC past $FFFF
    let out = assemble("ORG $FFFE\nWORD 1\n").unwrap();
    assert_eq!(out.diags[0].error, AsmError::MaxLc);
    assert!(out.srec.is_empty());

    // one word lower fits exactly
    let out = assemble("ORG $FFFC\nWORD 1\n").unwrap();
    assert!(out.diags.is_empty(), "diags: {:?}", out.diags);
    assert!(!out.srec.is_empty());
}

#[test]
fn duplicate_symbol_reported_once() {
    let out = assemble("A: RETI\nA: RETI\n").unwrap();
    assert_eq!(out.diags.len(), 1);
    assert_eq!(out.diags[0].error, AsmError::DuplicateSymbol("A".to_string()));
    assert_eq!(out.diags[0].line, 2);
}

#[test]
fn checksums_resum_to_ff() {
    // long enough to split across several records
    let srec = assemble_clean(
        "ORG $200\nMSG: ASCII \"a string long enough to spill into multiple output records\"\nWORD $BEEF\nEND $200\n",
    );
    let lines: Vec<&str> = srec.lines().collect();
    assert!(lines.len() > 2);
    for line in &lines {
        let sum: u32 = (2..line.len())
            .step_by(2)
            .map(|i| u32::from_str_radix(&line[i..i + 2], 16).unwrap())
            .sum();
        assert_eq!(sum & 0xFF, 0xFF, "bad checksum in {line}");
    }
    assert_eq!(*lines.last().unwrap(), "S9030200FA");
}

#[test]
fn listing_carries_echo_and_symbol_dump() {
    let out = assemble("LOOP: MOV #0, R5\nJMP LOOP\nEND\n").unwrap();
    assert!(out.listing.contains("------Record 1------: LOOP: MOV #0, R5"));
    assert!(out.listing.contains("Symbol Table"));
    assert!(out.listing.contains("LOOP"));
    // pass-two trace for the first opcode word
    assert!(out.listing.contains("0000: 4305"));
}

#[test]
fn errors_echo_into_the_listing() {
    let out = assemble("MOV R4, #5\n").unwrap();
    assert!(out.listing.contains("ERROR: Invalid destination addressing mode"));
}

#[test]
fn bss_and_origin_layout() {
    let srec = assemble_clean("ORG $10\nBUF: BSS 3\nALIGN\nWORD $1234\n");
    let lines: Vec<&str> = srec.lines().collect();
    // 3 reserved zeros, 1 alignment pad, then the word at $14
    assert_eq!(lines[0], "S1090010000000003412A0");
    assert_eq!(lines[1], "S9030000FC");
}
