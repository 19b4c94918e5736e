use rand::Rng;

pub const HEADS: &str = "the gods of fortune say 'heads'";
pub const TAILS: &str = "'tails' is the result";

/// Flip a fair coin. Arguments are ignored.
pub fn coinflip(_args: &[String]) -> String {
    if rand::thread_rng().gen_bool(0.5) {
        HEADS.to_string()
    } else {
        TAILS.to_string()
    }
}
