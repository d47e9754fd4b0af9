use std::collections::BTreeSet;

/// Hands out `<prefix><n>` ids, `n = 1, 2, 3, …`, skipping any number some existing id already uses.
pub(crate) struct IdAssigner {
    prefix: &'static str,
    next_int: u64,
    reserved_nums: BTreeSet<u64>,
}

impl IdAssigner {
    pub(crate) fn new<'a, I>(prefix: &'static str, existing_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let reserved_nums = existing_ids
            .into_iter()
            .filter_map(|id| id.strip_prefix(prefix))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .collect();
        IdAssigner {
            prefix,
            next_int: 1,
            reserved_nums,
        }
    }

    pub(crate) fn next_id(&mut self) -> String {
        let num = self.next_num();
        format!("{}{num}", self.prefix)
    }

    fn next_num(&mut self) -> u64 {
        let mut available_number = self.next_int;
        let reserved_range = self.reserved_nums.range(self.next_int..);
        for &reserved_num in reserved_range {
            if available_number != reserved_num {
                break;
            }
            available_number += 1;
        }
        self.next_int = available_number + 1;
        available_number
    }
}
