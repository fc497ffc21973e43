//! Avatar shop catalog.
//!
//! Nine cosmetic items, three per [`EquipSlot`]. Items have no gameplay
//! effect; they only cost coins.

use crate::progress::EquipSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarItem {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
    pub slot: EquipSlot,
}

const CATALOG: [AvatarItem; 9] = [
    // Hats
    AvatarItem { id: "hat_1", name: "Top Hat", cost: 25, slot: EquipSlot::Hat },
    AvatarItem { id: "hat_2", name: "Baseball Cap", cost: 15, slot: EquipSlot::Hat },
    AvatarItem { id: "hat_3", name: "Crown", cost: 100, slot: EquipSlot::Hat },
    // Shirts
    AvatarItem { id: "shirt_1", name: "T-Shirt", cost: 20, slot: EquipSlot::Shirt },
    AvatarItem { id: "shirt_2", name: "Dress Shirt", cost: 35, slot: EquipSlot::Shirt },
    AvatarItem { id: "shirt_3", name: "Hoodie", cost: 30, slot: EquipSlot::Shirt },
    // Accessories
    AvatarItem { id: "acc_1", name: "Glasses", cost: 40, slot: EquipSlot::Accessory },
    AvatarItem { id: "acc_2", name: "Watch", cost: 60, slot: EquipSlot::Accessory },
    AvatarItem { id: "acc_3", name: "Necklace", cost: 80, slot: EquipSlot::Accessory },
];

/// Every item in shop order.
pub fn catalog() -> &'static [AvatarItem] {
    &CATALOG
}

pub fn find_item(id: &str) -> Option<&'static AvatarItem> {
    CATALOG.iter().find(|item| item.id == id)
}

pub fn items_in_slot(slot: EquipSlot) -> impl Iterator<Item = &'static AvatarItem> {
    CATALOG.iter().filter(move |item| item.slot == slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_three_items_per_slot() {
        for slot in EquipSlot::ALL {
            assert_eq!(items_in_slot(slot).count(), 3, "slot {}", slot);
        }
    }

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<_> = catalog().iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn test_find_item() {
        let crown = find_item("hat_3").unwrap();
        assert_eq!(crown.name, "Crown");
        assert_eq!(crown.cost, 100);
        assert_eq!(crown.slot, EquipSlot::Hat);
        assert!(find_item("hat_9").is_none());
    }
}
