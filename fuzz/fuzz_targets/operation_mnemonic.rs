extern crate bitcoincash_script_op;
extern crate honggfuzz;

use bitcoincash_script_op::blockdata::script::{Minimal, Operation};
use honggfuzz::fuzz;

fn do_test(data: &[u8]) {
    if let Some(op) = Operation::from_data(data.to_vec(), Minimal::No) {
        let text = op.to_mnemonic(0);
        let reparsed: Operation = text.parse().expect("to_mnemonic's own output must parse");
        assert_eq!(reparsed, op);
    }
}

fn main() {
    loop {
        fuzz!(|data| {
            do_test(data);
        });
    }
}
