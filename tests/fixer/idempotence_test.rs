//! A second fixer pass over repaired output must change nothing.

use tessier::fixer::autofix;

const MESSY: &str = "\
---
name: OrderTable
description: sortable table of orders
---
const columns = ['id', 'total'];

export const OrderTable = ({ orders, sort }) => {
  return (
    <table onclick={sort}>
      {orders.map(order => <tr>{order.id}</tr>)}
    </table>
  );
};
";

#[test]
fn every_fix_category_applies_once_then_never_again() {
    let first = autofix(MESSY);
    let descriptions: Vec<String> = first.fixes.iter().map(ToString::to_string).collect();
    assert!(descriptions.iter().any(|d| d.contains("hoisted")), "{descriptions:?}");
    assert!(descriptions.iter().any(|d| d.contains("synthetic key")));
    assert!(descriptions.iter().any(|d| d.contains("normalized")));
    assert!(descriptions.iter().any(|d| d.contains("import")));

    let second = autofix(&first.code);
    assert!(second.fixes.is_empty(), "second pass: {:?}", second.fixes);
    assert_eq!(second.code, first.code);
}

#[test]
fn preamble_is_reattached_byte_for_byte() {
    let first = autofix(MESSY);
    assert!(first
        .code
        .starts_with("---\nname: OrderTable\ndescription: sortable table of orders\n---\n"));
}

#[test]
fn already_clean_source_is_a_fixed_point() {
    let clean = autofix(MESSY).code;
    let again = autofix(&clean).code;
    let thrice = autofix(&again).code;
    assert_eq!(again, thrice);
}

#[test]
fn fix_order_is_stable_across_runs() {
    let a = autofix(MESSY);
    let b = autofix(MESSY);
    assert_eq!(a.code, b.code);
    assert_eq!(
        a.fixes.iter().map(ToString::to_string).collect::<Vec<_>>(),
        b.fixes.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
}
