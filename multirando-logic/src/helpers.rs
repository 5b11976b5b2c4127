use hashbrown::HashSet;
use multirando_game::{ItemIdx, RegionId, Requirement};

fn walk_with_rules<F: FnMut(&Requirement)>(
    req: &Requirement,
    rules: &[Option<Requirement>],
    seen_rules: &mut HashSet<usize>,
    f: &mut F,
) {
    let mut nested: Vec<usize> = vec![];
    req.visit(&mut |r| {
        f(r);
        if let Requirement::Rule(rule) = r {
            nested.push(*rule);
        }
    });
    for rule in nested {
        if !seen_rules.insert(rule) {
            continue;
        }
        if let Some(Some(rule_req)) = rules.get(rule) {
            walk_with_rules(rule_req, rules, seen_rules, f);
        }
    }
}

// Items a requirement depends on, following named rules.
pub fn collect_item_refs(req: &Requirement, rules: &[Option<Requirement>]) -> HashSet<ItemIdx> {
    let mut out: HashSet<ItemIdx> = HashSet::new();
    walk_with_rules(req, rules, &mut HashSet::new(), &mut |r| {
        out.extend(requirement_items(r));
    });
    out
}

// Regions a requirement depends on, following named rules.
pub fn collect_region_refs(
    req: &Requirement,
    rules: &[Option<Requirement>],
) -> HashSet<RegionId> {
    let mut out: HashSet<RegionId> = HashSet::new();
    walk_with_rules(req, rules, &mut HashSet::new(), &mut |r| {
        if let Requirement::Region(region) = r {
            out.insert(*region);
        }
    });
    out
}

pub fn is_inventory_only(req: &Requirement, rules: &[Option<Requirement>]) -> bool {
    collect_region_refs(req, rules).is_empty()
}

fn requirement_items(req: &Requirement) -> Vec<ItemIdx> {
    match req {
        Requirement::Item(item) | Requirement::ItemCount(item, _) => vec![*item],
        Requirement::AllItems(items) | Requirement::AnyItem(items) => items.clone(),
        _ => vec![],
    }
}
