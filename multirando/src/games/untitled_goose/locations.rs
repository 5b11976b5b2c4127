use multirando_game::LocationId;
use strum_macros::{Display, EnumString};

use super::ID_BASE;
use super::options::{Goal, GooseOptions};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Area {
    Hub,
    Garden,
    #[strum(serialize = "High Street")]
    HighStreet,
    #[strum(serialize = "Back Gardens")]
    BackGardens,
    Pub,
    #[strum(serialize = "Model Village")]
    ModelVillage,
}

// Areas behind an access item, in item code order.
pub const ACCESS_AREAS: [Area; 5] = [
    Area::Garden,
    Area::HighStreet,
    Area::BackGardens,
    Area::Pub,
    Area::ModelVillage,
];

impl Area {
    pub fn access_item(self) -> String {
        format!("{self} Access")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum Npc {
    Groundskeeper,
    Boy,
    #[strum(serialize = "TV Shop Owner")]
    TvShopOwner,
    #[strum(serialize = "Market Lady")]
    MarketLady,
    #[strum(serialize = "Tidy Neighbour")]
    TidyNeighbour,
    #[strum(serialize = "Messy Neighbour")]
    MessyNeighbour,
    #[strum(serialize = "Burly Man")]
    BurlyMan,
    #[strum(serialize = "Old Man")]
    OldMan,
    #[strum(serialize = "Pub Lady")]
    PubLady,
    #[strum(serialize = "Fancy Ladies")]
    FancyLadies,
    Cook,
}

// In item code order.
pub const ALL_NPCS: [Npc; 11] = [
    Npc::Groundskeeper,
    Npc::Boy,
    Npc::TvShopOwner,
    Npc::MarketLady,
    Npc::TidyNeighbour,
    Npc::MessyNeighbour,
    Npc::BurlyMan,
    Npc::OldMan,
    Npc::PubLady,
    Npc::FancyLadies,
    Npc::Cook,
];

impl Npc {
    pub fn soul_item(self) -> String {
        format!("{self} Soul")
    }
}

pub fn prop_soul_item(prop: &str) -> String {
    format!("{prop} Soul")
}

#[derive(Clone, Debug)]
pub struct LocationData {
    pub name: &'static str,
    pub area: Area,
    pub npcs: &'static [Npc],   // NPCs that must be present (with NPC souls on)
    pub props: &'static [&'static str], // Props that must be usable (with prop souls on)
    pub needs: &'static [Area], // Other areas that must be reachable
}

const fn loc(
    name: &'static str,
    area: Area,
    npcs: &'static [Npc],
    props: &'static [&'static str],
) -> LocationData {
    LocationData {
        name,
        area,
        npcs,
        props,
        needs: &[],
    }
}

const fn loc_needs(
    name: &'static str,
    area: Area,
    npcs: &'static [Npc],
    props: &'static [&'static str],
    needs: &'static [Area],
) -> LocationData {
    LocationData {
        name,
        area,
        npcs,
        props,
        needs,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetKind {
    MainGoals,
    ExtraGoals,
    Completion,
    SpeedrunGoals,
    MainMilestone,
    AllMilestone,
    ItemPickups,
    UniqueItems,
    DragItems,
    Interactions,
    SandcastlePecks,
}

impl SetKind {
    // Counted towards the "All Goals" milestone.
    pub fn is_goal(self) -> bool {
        matches!(
            self,
            SetKind::MainGoals | SetKind::ExtraGoals | SetKind::Completion | SetKind::SpeedrunGoals
        )
    }
}

#[derive(Debug)]
pub struct LocationSet {
    pub kind: SetKind,
    pub id_offset: Option<u64>, // None for event locations
    pub locations: &'static [LocationData],
}

use Area::*;
use Npc::*;

const MAIN_GOALS: &[LocationData] = &[
    loc("Get into the garden", Garden, &[], &[]),
    loc("Get the groundskeeper wet", Garden, &[Groundskeeper], &[]),
    loc("Steal the groundskeeper's keys", Garden, &[Groundskeeper], &["Keys"]),
    loc("Make the groundskeeper wear his sun hat", Garden, &[Groundskeeper], &["Sun Hat"]),
    loc("Rake in the lake", Garden, &[], &["Rake"]),
    loc("Have a picnic", Garden, &[], &["Thermos"]),
    loc("Make the groundskeeper hammer his thumb", Garden, &[Groundskeeper], &[]),
    loc("Break the broom", HighStreet, &[MarketLady], &["Push Broom"]),
    loc("Trap the boy in the phone booth", HighStreet, &[Boy], &[]),
    loc("Make the boy wear the wrong glasses", HighStreet, &[Boy], &["Horn-Rimmed Glasses"]),
    loc("Make someone buy back their own stuff", HighStreet, &[MarketLady], &[]),
    loc("Get on TV", HighStreet, &[TvShopOwner], &[]),
    loc("Go shopping", HighStreet, &[MarketLady], &["Shopping Basket"]),
    loc("Trap the shopkeeper in the garage", HighStreet, &[MarketLady], &[]),
    loc("Make someone break the fancy vase", BackGardens, &[TidyNeighbour], &["Fancy Vase"]),
    loc("Help the woman dress up the bust", BackGardens, &[TidyNeighbour], &["Bust Pipe"]),
    loc("Make the man spit out his tea", BackGardens, &[MessyNeighbour], &[]),
    loc("Get dressed up with a ribbon", BackGardens, &[], &["Bow"]),
    loc("Make the man go barefoot", BackGardens, &[MessyNeighbour], &["Slipper"]),
    loc("Do the washing", BackGardens, &[], &["Soap"]),
    loc("Make someone prune the prize rose", BackGardens, &[TidyNeighbour], &["Rose"]),
    loc("Get into the pub", Pub, &[], &[]),
    loc("Break the dartboard", Pub, &[BurlyMan], &[]),
    loc("Get the toy boat", Pub, &[], &["Toy Boat"]),
    loc("Make the old man fall on his bum", Pub, &[OldMan], &[]),
    loc("Be awarded a flower", Pub, &[FancyLadies], &[]),
    loc("Steal a pint glass and drop it in the canal", Pub, &[PubLady], &["Pint Glass"]),
    loc("Set the table", Pub, &[Cook], &["Plate"]),
    loc("Drop a bucket on the burly man's head", Pub, &[BurlyMan], &["Bucket"]),
    loc("Get into the model village", ModelVillage, &[], &[]),
    loc("Steal the beautiful miniature golden bell", ModelVillage, &[], &["Golden Bell"]),
    loc_needs(
        "...and take it all the way back home",
        ModelVillage,
        &[],
        &["Golden Bell", "Timber Handle"],
        &[Garden, HighStreet, BackGardens, Pub],
    ),
];

const EXTRA_GOALS: &[LocationData] = &[
    loc("Lock the groundskeeper out of the garden", Garden, &[Groundskeeper], &[]),
    loc("Cabbage picnic", Garden, &[], &["Cabbage"]),
    loc("Trip the boy in the puddle", HighStreet, &[Boy], &[]),
    loc("Make the scales ding", HighStreet, &[MarketLady], &[]),
    loc("Open an umbrella inside the TV shop", HighStreet, &[TvShopOwner], &["Black Umbrella"]),
    loc_needs(
        "Make someone from outside the high street buy back their own stuff",
        HighStreet,
        &[MarketLady, Groundskeeper],
        &[],
        &[Garden],
    ),
    loc_needs(
        "Collect the five flowers",
        Hub,
        &[],
        &[],
        &[Garden, HighStreet, BackGardens, Pub],
    ),
    loc("Trap the boy in the garage", HighStreet, &[Boy], &[]),
    loc("Catch an object as it falls", BackGardens, &[TidyNeighbour], &[]),
    loc("Score a goal", BackGardens, &[], &["Football"]),
    loc("Sail the toy boat under a bridge", Pub, &[], &["Toy Boat"]),
    loc_needs(
        "Perform at the pub wearing a ribbon",
        Pub,
        &[],
        &["Bow", "Harmonica"],
        &[BackGardens],
    ),
    loc("Steal the old man's woolen hat", Pub, &[OldMan], &["Woolen Hat"]),
];

const COMPLETION: &[LocationData] = &[loc("Complete All Extra Goals", Hub, &[], &[])];

const SPEEDRUN_GOALS: &[LocationData] = &[
    loc("Complete Garden before noon", Garden, &[], &[]),
    loc("Complete High Street before noon", HighStreet, &[], &[]),
    loc("Complete Back Gardens before noon", BackGardens, &[], &[]),
    loc("Complete Pub before noon", Pub, &[], &[]),
];

const MAIN_MILESTONE: &[LocationData] = &[loc("All Main Task Lists Complete", Hub, &[], &[])];

const ALL_MILESTONE: &[LocationData] = &[loc("All Tasks Complete", Hub, &[], &[])];

const fn pickup(name: &'static str, area: Area, prop: &'static [&'static str]) -> LocationData {
    loc(name, area, &[], prop)
}

const ITEM_PICKUPS: &[LocationData] = &[
    pickup("Pick up Radio", Garden, &["Radio"]),
    pickup("Pick up Trowel", Garden, &["Trowel"]),
    pickup("Pick up Keys", Garden, &["Keys"]),
    pickup("Pick up Tulip", Garden, &["Tulip"]),
    pickup("Pick up Apple", Garden, &["Apple"]),
    pickup("Pick up Jam", Garden, &["Jam"]),
    pickup("Pick up Picnic Mug", Garden, &["Picnic Mug"]),
    pickup("Pick up Thermos", Garden, &["Thermos"]),
    pickup("Pick up Sandwich", Garden, &["Sandwich"]),
    pickup("Pick up Sun Hat", Garden, &["Sun Hat"]),
    pickup("Pick up Drink Can", Garden, &["Drink Can"]),
    pickup("Pick up Cabbage", Garden, &["Cabbage"]),
    pickup("Pick up Carrot", Garden, &["Carrot"]),
    pickup("Pick up Horn-Rimmed Glasses", HighStreet, &["Horn-Rimmed Glasses"]),
    pickup("Pick up Red Glasses", HighStreet, &["Red Glasses"]),
    pickup("Pick up Sunglasses", HighStreet, &["Sunglasses"]),
    pickup("Pick up Toilet Paper", HighStreet, &["Toilet Paper"]),
    pickup("Pick up Toy Car", HighStreet, &["Toy Car"]),
    pickup("Pick up Hairbrush", HighStreet, &["Hairbrush"]),
    pickup("Pick up Toothbrush", HighStreet, &["Toothbrush"]),
    pickup("Pick up Stereoscope", HighStreet, &["Stereoscope"]),
    pickup("Pick up Dish Soap Bottle", HighStreet, &["Dish Soap Bottle"]),
    pickup("Pick up Spray Bottle", HighStreet, &["Spray Bottle"]),
    pickup("Pick up Orange", HighStreet, &["Orange"]),
    pickup("Pick up Leek", HighStreet, &["Leek"]),
    pickup("Pick up Cucumber", HighStreet, &["Cucumber"]),
    pickup("Pick up Loaf of Bread", HighStreet, &["Loaf of Bread"]),
    pickup("Pick up Tinned Food", HighStreet, &["Tinned Food"]),
    pickup("Pick up Walkie Talkie", HighStreet, &["Walkie Talkie"]),
    pickup("Pick up Dummy", BackGardens, &["Dummy"]),
    pickup("Pick up Cricket Ball", BackGardens, &["Cricket Ball"]),
    pickup("Pick up Bust Pipe", BackGardens, &["Bust Pipe"]),
    pickup("Pick up Bust Hat", BackGardens, &["Bust Hat"]),
    pickup("Pick up Bust Glasses", BackGardens, &["Bust Glasses"]),
    pickup("Pick up Tea Cup", BackGardens, &["Tea Cup"]),
    pickup("Pick up Rose", BackGardens, &["Rose"]),
    pickup("Pick up Bow", BackGardens, &["Bow"]),
    pickup("Pick up Soap", BackGardens, &["Soap"]),
    pickup("Pick up Paintbrush", BackGardens, &["Paintbrush"]),
    pickup("Pick up Slipper", BackGardens, &["Slipper"]),
    pickup("Pick up Badminton Racket", BackGardens, &["Badminton Racket"]),
    pickup("Pick up Fishing Bobber", Pub, &["Fishing Bobber"]),
    pickup("Pick up Exit Letter", Pub, &["Exit Letter"]),
    pickup("Pick up Pint Glass", Pub, &["Pint Glass"]),
    pickup("Pick up Toy Boat", Pub, &["Toy Boat"]),
    pickup("Pick up Woolen Hat", Pub, &["Woolen Hat"]),
    pickup("Pick up Plate", Pub, &["Plate"]),
    pickup("Pick up Quoit", Pub, &["Quoit"]),
    pickup("Pick up Fork", Pub, &["Fork"]),
    pickup("Pick up Knife", Pub, &["Knife"]),
    pickup("Pick up Candlestick", Pub, &["Candlestick"]),
    pickup("Pick up Harmonica", Pub, &["Harmonica"]),
    pickup("Pick up Mini Person", ModelVillage, &["Mini Person"]),
    pickup("Pick up Mini Shovel", ModelVillage, &["Mini Shovel"]),
    pickup("Pick up Mini Bench", ModelVillage, &["Mini Bench"]),
    pickup("Pick up Mini Pump", ModelVillage, &["Mini Pump"]),
    pickup("Pick up Timber Handle", ModelVillage, &["Timber Handle"]),
];

// Individually tracked copies of repeated items.
const UNIQUE_ITEMS: &[LocationData] = &[
    pickup("Garden Carrot 1", Garden, &["Carrot"]),
    pickup("Garden Carrot 2", Garden, &["Carrot"]),
    pickup("Garden Carrot 3", Garden, &["Carrot"]),
    pickup("Garden Carrot 4", Garden, &["Carrot"]),
    pickup("Garden Carrot 5", Garden, &["Carrot"]),
    pickup("Garden Carrot 6", Garden, &["Carrot"]),
    pickup("Garden Carrot 7", Garden, &["Carrot"]),
    pickup("Garden Carrot 8", Garden, &["Carrot"]),
    pickup("Garden Carrot 9", Garden, &["Carrot"]),
    pickup("Garden Carrot 10", Garden, &["Carrot"]),
];

const DRAG_ITEMS: &[LocationData] = &[
    pickup("Drag Rake", Garden, &["Rake"]),
    pickup("Drag Picnic Basket", Garden, &["Picnic Basket"]),
    pickup("Drag Esky", Garden, &["Esky"]),
    pickup("Drag Pumpkin", Garden, &["Pumpkin"]),
    pickup("Drag Watering Can", Garden, &["Watering Can"]),
    pickup("Drag Shopping Basket", HighStreet, &["Shopping Basket"]),
    pickup("Drag Push Broom", HighStreet, &["Push Broom"]),
    pickup("Drag Black Umbrella", HighStreet, &["Black Umbrella"]),
    pickup("Drag Rainbow Umbrella", HighStreet, &["Rainbow Umbrella"]),
    pickup("Drag Red Umbrella", HighStreet, &["Red Umbrella"]),
    pickup("Drag Fruit Crate", HighStreet, &["Fruit Crate"]),
    pickup("Drag Fancy Vase", BackGardens, &["Fancy Vase"]),
    pickup("Drag Garden Gnome", BackGardens, &["Garden Gnome"]),
    pickup("Drag Sack", BackGardens, &["Sack"]),
    pickup("Drag Football", BackGardens, &["Football"]),
    pickup("Drag Traffic Cone", Pub, &["Traffic Cone"]),
    pickup("Drag Bucket", Pub, &["Bucket"]),
    pickup("Drag Tomato Box", Pub, &["Tomato Box"]),
    pickup("Drag Tackle Box", Pub, &["Tackle Box"]),
    pickup("Drag Mini Mail Pillar", ModelVillage, &["Mini Mail Pillar"]),
];

const INTERACTIONS: &[LocationData] = &[
    loc("Break the Boards at the Well", Hub, &[], &[]),
    loc("Turn on the Sprinkler", Garden, &[], &[]),
    loc("Ring the Shop Bell", HighStreet, &[], &[]),
    loc("Turn on the TVs", HighStreet, &[TvShopOwner], &[]),
    loc("Ring the Wind Chimes", BackGardens, &[], &[]),
    loc("Spin the Windmill", BackGardens, &[], &[]),
    loc("Ring the Pub Bell", Pub, &[], &[]),
    loc("Turn on the Tap", Pub, &[], &[]),
    loc("Spin the Mini Windmill", ModelVillage, &[], &[]),
    loc("Ring the Mini Bell", ModelVillage, &[], &[]),
];

const SANDCASTLE_PECKS: &[LocationData] = &[
    loc("Sandcastle Peck 1", Hub, &[], &[]),
    loc("Sandcastle Peck 2", Hub, &[], &[]),
    loc("Sandcastle Peck 3", Hub, &[], &[]),
    loc("Sandcastle Peck 4", Hub, &[], &[]),
    loc("Sandcastle Peck 5", Hub, &[], &[]),
];

pub struct SetRule {
    pub include: fn(&GooseOptions) -> bool,
    pub set: LocationSet,
}

fn always(_: &GooseOptions) -> bool {
    true
}

fn extra_goals(o: &GooseOptions) -> bool {
    o.include_extra_goals
}

fn speedrun_goals(o: &GooseOptions) -> bool {
    o.include_speedrun_goals
}

fn main_milestone(o: &GooseOptions) -> bool {
    o.goal == Goal::AllMainGoals
}

fn all_milestone(o: &GooseOptions) -> bool {
    o.goal == Goal::AllGoals
}

fn item_pickups(o: &GooseOptions) -> bool {
    o.include_item_pickups
}

fn drag_items(o: &GooseOptions) -> bool {
    o.include_drag_items
}

fn interactions(o: &GooseOptions) -> bool {
    o.include_interactions
}

// World content as (option predicate, location set) pairs, in construction order.
pub const LOCATION_SET_RULES: &[SetRule] = &[
    SetRule {
        include: always,
        set: LocationSet {
            kind: SetKind::MainGoals,
            id_offset: Some(0),
            locations: MAIN_GOALS,
        },
    },
    SetRule {
        include: extra_goals,
        set: LocationSet {
            kind: SetKind::ExtraGoals,
            id_offset: Some(100),
            locations: EXTRA_GOALS,
        },
    },
    SetRule {
        include: extra_goals,
        set: LocationSet {
            kind: SetKind::Completion,
            id_offset: Some(150),
            locations: COMPLETION,
        },
    },
    SetRule {
        include: speedrun_goals,
        set: LocationSet {
            kind: SetKind::SpeedrunGoals,
            id_offset: Some(160),
            locations: SPEEDRUN_GOALS,
        },
    },
    SetRule {
        include: main_milestone,
        set: LocationSet {
            kind: SetKind::MainMilestone,
            id_offset: None,
            locations: MAIN_MILESTONE,
        },
    },
    SetRule {
        include: all_milestone,
        set: LocationSet {
            kind: SetKind::AllMilestone,
            id_offset: None,
            locations: ALL_MILESTONE,
        },
    },
    SetRule {
        include: item_pickups,
        set: LocationSet {
            kind: SetKind::ItemPickups,
            id_offset: Some(1000),
            locations: ITEM_PICKUPS,
        },
    },
    SetRule {
        include: item_pickups,
        set: LocationSet {
            kind: SetKind::UniqueItems,
            id_offset: Some(1300),
            locations: UNIQUE_ITEMS,
        },
    },
    SetRule {
        include: drag_items,
        set: LocationSet {
            kind: SetKind::DragItems,
            id_offset: Some(1500),
            locations: DRAG_ITEMS,
        },
    },
    SetRule {
        include: interactions,
        set: LocationSet {
            kind: SetKind::Interactions,
            id_offset: Some(1700),
            locations: INTERACTIONS,
        },
    },
    SetRule {
        include: always,
        set: LocationSet {
            kind: SetKind::SandcastlePecks,
            id_offset: Some(1900),
            locations: SANDCASTLE_PECKS,
        },
    },
];

#[derive(Clone, Debug)]
pub struct PlannedLocation {
    pub kind: SetKind,
    pub id: Option<LocationId>,
    pub data: &'static LocationData,
}

// Folds the set rules into the list of locations to build for these options.
pub fn construction_trace(options: &GooseOptions) -> Vec<PlannedLocation> {
    LOCATION_SET_RULES
        .iter()
        .filter(|rule| (rule.include)(options))
        .flat_map(|rule| {
            let set = &rule.set;
            set.locations
                .iter()
                .enumerate()
                .map(move |(i, data)| PlannedLocation {
                    kind: set.kind,
                    id: set.id_offset.map(|offset| ID_BASE + offset + i as u64),
                    data,
                })
        })
        .collect()
}

// Every prop any location can reference, in first-appearance order. Prop soul item codes follow
// this order, so they do not depend on options.
pub fn all_props() -> Vec<&'static str> {
    let mut props: Vec<&'static str> = vec![];
    for rule in LOCATION_SET_RULES {
        for data in rule.set.locations {
            for &prop in data.props {
                if !props.contains(&prop) {
                    props.push(prop);
                }
            }
        }
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn test_unique_names_and_ids() {
        let mut names: HashSet<&str> = HashSet::new();
        let mut ids: HashSet<LocationId> = HashSet::new();
        for rule in LOCATION_SET_RULES {
            let set = &rule.set;
            for (i, data) in set.locations.iter().enumerate() {
                assert!(names.insert(data.name), "duplicate location {}", data.name);
                if let Some(offset) = set.id_offset {
                    assert!(ids.insert(ID_BASE + offset + i as u64));
                }
            }
        }
    }

    #[test]
    fn test_id_ranges_do_not_overlap() {
        let mut ranges: Vec<(u64, u64)> = LOCATION_SET_RULES
            .iter()
            .filter_map(|r| {
                r.set
                    .id_offset
                    .map(|o| (o, o + r.set.locations.len() as u64))
            })
            .collect();
        ranges.sort();
        for w in ranges.windows(2) {
            assert!(w[0].1 <= w[1].0);
        }
    }

    #[test]
    fn test_bell_props_present() {
        let props = all_props();
        assert!(props.contains(&"Golden Bell"));
        assert!(props.contains(&"Timber Handle"));
    }
}
