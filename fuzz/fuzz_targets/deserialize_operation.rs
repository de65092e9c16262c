extern crate bitcoincash_script_op;
extern crate honggfuzz;

use bitcoincash_script_op::blockdata::script::Operation;
use bitcoincash_script_op::consensus::encode::serialize;
use honggfuzz::fuzz;
use std::io::Cursor;

fn do_test(data: &[u8]) {
    let mut cursor = Cursor::new(data);
    let op = Operation::from_reader(&mut cursor);
    if op.is_valid() {
        // A successfully decoded operation must re-encode to the prefix
        // of `data` that was actually consumed.
        let consumed = cursor.position() as usize;
        assert_eq!(serialize(&op), data[..consumed]);
    }
}

fn main() {
    loop {
        fuzz!(|data| {
            do_test(data);
        });
    }
}
