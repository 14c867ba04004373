// Lexicographic iteration over every key of a transducer.

use crate::{FstError, MAX_KEY_LENGTH, StateId, Traversal};

struct Frame {
    state: StateId,
    next: usize,
    count: usize,
    output: u64,
}

/// Iterator over all (key, weight) pairs of a transducer, in key order.
///
/// Uses an explicit depth-first stack: one frame per character of the
/// current key. A key is yielded when its final state is first entered, so
/// a key precedes all of its extensions.
///
/// The first structural error ends the iteration.
pub struct EntryIterator<'a, T: Traversal> {
    traversal: &'a T,
    stack: Vec<Frame>,
    key: String,
    started: bool,
    done: bool,
}

impl<'a, T: Traversal> EntryIterator<'a, T> {
    pub fn new(traversal: &'a T) -> Self {
        Self {
            traversal,
            stack: Vec::new(),
            key: String::new(),
            started: false,
            done: false,
        }
    }

    fn enter(&mut self, state: StateId, output: u64) -> Result<Option<(String, u64)>, FstError> {
        if self.stack.len() > MAX_KEY_LENGTH {
            return Err(FstError::corrupt(state, "path exceeds the maximum key length"));
        }
        let count = self.traversal.transition_count(state)?;
        self.stack.push(Frame {
            state,
            next: 0,
            count,
            output,
        });
        Ok(self
            .traversal
            .final_output(state)?
            .map(|fo| (self.key.clone(), output + fo as u64)))
    }

    fn advance(&mut self) -> Result<Option<(String, u64)>, FstError> {
        if !self.started {
            self.started = true;
            let start = self.traversal.start_state();
            if let Some(entry) = self.enter(start, 0)? {
                return Ok(Some(entry));
            }
        }

        while let Some(top) = self.stack.last_mut() {
            if top.next < top.count {
                let arc = self.traversal.transition(top.state, top.next)?;
                top.next += 1;
                let output = top.output + arc.output as u64;
                self.key.push(arc.label);
                if let Some(entry) = self.enter(arc.target, output)? {
                    return Ok(Some(entry));
                }
            } else {
                self.stack.pop();
                if !self.stack.is_empty() {
                    self.key.pop();
                }
            }
        }
        Ok(None)
    }
}

impl<T: Traversal> Iterator for EntryIterator<'_, T> {
    type Item = Result<(String, u64), FstError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Fst, FstBuilder};

    fn keys(entries: &[(&str, u32)]) -> Vec<(String, u64)> {
        let mut builder = FstBuilder::new();
        for &(k, w) in entries {
            builder.insert(k, w).unwrap();
        }
        let fst = Fst::from_bytes(&builder.finish().unwrap()).unwrap();
        fst.entries().map(|e| e.unwrap()).collect()
    }

    #[test]
    fn yields_keys_in_order() {
        let got = keys(&[("aaa", 1), ("abcde", 2), ("bar", 3), ("foo", 4), ("zar", 5)]);
        let names: Vec<&str> = got.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["aaa", "abcde", "bar", "foo", "zar"]);
    }

    #[test]
    fn yields_weights() {
        let got = keys(&[("eads", 576), ("facebook", 4_368_451), ("youtube", 2_622_207)]);
        assert_eq!(
            got,
            vec![
                ("eads".to_string(), 576),
                ("facebook".to_string(), 4_368_451),
                ("youtube".to_string(), 2_622_207),
            ]
        );
    }

    #[test]
    fn key_precedes_its_extensions() {
        let got = keys(&[("", 1), ("car", 3), ("cart", 1)]);
        let names: Vec<&str> = got.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["", "car", "cart"]);
    }

    #[test]
    fn empty_dictionary_yields_nothing() {
        assert!(keys(&[]).is_empty());
    }
}
