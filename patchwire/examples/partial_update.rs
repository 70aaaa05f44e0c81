//! Backing-store walkthrough using the patchwire meta crate.
//!
//! This demonstrates the change-tracking lifecycle a generated model
//! goes through, driven by hand so each step is visible:
//! 1. Hydration writes that never count as changes
//! 2. User writes that do
//! 3. Explicit nulls, tracked apart from "never set"
//! 4. In-place collection growth detected without a further write

use patchwire::prelude::*;

fn main() {
    let store = new_backing_store();

    // A parse pass would flip this off before assigning fields; done
    // manually here since no wire format is involved.
    store.set_initialization_completed(false);
    store.set("id", "u-100".into());
    store.set("display_name", "Maya".into());
    store.set(
        "aliases",
        StoredValue::collection(vec!["maya".into()]),
    );
    store.set_initialization_completed(true);

    store.set_return_only_changed_values(true);
    println!("changes right after hydration: {:?}", store.enumerate());
    store.set_return_only_changed_values(false);

    // A user edit and an explicit clear.
    store.set("display_name", "Maya R.".into());
    store.set("nickname", StoredValue::Null);

    // Growing the collection in place, no write-through needed.
    if let Some(aliases) = store.get("aliases").and_then(|v| v.as_collection().cloned()) {
        if let Ok(mut aliases) = aliases.write() {
            aliases.push("mr".into());
        }
    }

    store.set_return_only_changed_values(true);
    for (key, value) in store.enumerate() {
        println!("changed: {key} = {value:?}");
    }
    println!(
        "cleared to null: {:?}",
        store.enumerate_keys_for_values_changed_to_null()
    );
    store.set_return_only_changed_values(false);
}
