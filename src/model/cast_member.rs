use super::{ChangeObserver, XmlDeserialize, assign};
use crate::coercion;
use serde::Serialize;
use std::cmp::Ordering;

/// An actor of a series, parsed from an `<Actor>` element of `actors.xml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CastMember {
    /// Id of the actor entry
    pub id: i32,
    /// Relative path of the actor image, e.g. "actors/79415.jpg"
    pub image_path: Option<String>,
    /// Real name of the actor
    pub name: Option<String>,
    /// Role the actor is playing
    pub role: Option<String>,
    /// Billing position; larger values sort first
    pub sort_order: i32,
}

impl CastMember {
    /// Orders cast members by descending sort order
    ///
    /// Use with `sort_by` to bring the most prominent actors to the front.
    pub fn cmp_by_sort_order(&self, other: &Self) -> Ordering {
        other.sort_order.cmp(&self.sort_order)
    }
}

impl XmlDeserialize for CastMember {
    fn apply_field(&mut self, tag: &str, text: &str, observer: &mut dyn ChangeObserver) -> bool {
        match tag {
            "id" => assign(&mut self.id, coercion::parse_int(text, 0), "id", observer),
            "image" => assign(&mut self.image_path, Some(text.to_string()), "image_path", observer),
            "name" => assign(&mut self.name, Some(text.to_string()), "name", observer),
            "role" => assign(&mut self.role, Some(text.to_string()), "role", observer),
            "sortorder" => assign(
                &mut self.sort_order,
                coercion::parse_int(text, 0),
                "sort_order",
                observer,
            ),
            _ => return false,
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> CastMember {
        let document = roxmltree::Document::parse(xml).unwrap();
        CastMember::from_node(Some(&document.root_element())).unwrap()
    }

    #[test]
    fn test_deserialize_actor() {
        let actor = parse(
            "<Actor><id>79415</id><Image>actors/79415.jpg</Image><Name>Nathan Fillion</Name>\
             <Role>Richard Castle</Role><SortOrder>0</SortOrder></Actor>",
        );

        assert_eq!(
            actor,
            CastMember {
                id: 79415,
                image_path: Some("actors/79415.jpg".to_string()),
                name: Some("Nathan Fillion".to_string()),
                role: Some("Richard Castle".to_string()),
                sort_order: 0,
            }
        );
    }

    #[test]
    fn test_deserialize_is_case_insensitive_and_lenient() {
        let actor = parse(
            "<Actor><ID>abc</ID><IMAGE></IMAGE><name>Stana Katic</name><sortorder>3</sortorder>\
             <Unknown>ignored</Unknown></Actor>",
        );

        assert_eq!(actor.id, 0);
        assert_eq!(actor.image_path, None);
        assert_eq!(actor.name.as_deref(), Some("Stana Katic"));
        assert_eq!(actor.role, None);
        assert_eq!(actor.sort_order, 3);
    }

    #[test]
    fn test_deserialize_without_node_fails() {
        let result = CastMember::from_node(None::<&roxmltree::Node>);
        match result {
            Err(crate::model::ModelError::InvalidArgument { parameter, .. }) => {
                assert_eq!(parameter, "node")
            }
            other => panic!("expected invalid argument, got {:?}", other),
        }
    }

    #[test]
    fn test_cmp_by_sort_order_is_descending() {
        let lead = CastMember {
            sort_order: 5,
            ..Default::default()
        };
        let support = CastMember {
            sort_order: 2,
            ..Default::default()
        };

        assert_eq!(lead.cmp_by_sort_order(&support), Ordering::Less);
        assert_eq!(support.cmp_by_sort_order(&lead), Ordering::Greater);
        assert_eq!(lead.cmp_by_sort_order(&lead), Ordering::Equal);

        let mut cast = vec![support.clone(), lead.clone()];
        cast.sort_by(CastMember::cmp_by_sort_order);
        assert_eq!(cast, vec![lead, support]);
    }

    #[test]
    fn test_observer_reports_changed_fields_only() {
        let document =
            roxmltree::Document::parse("<Actor><id>1</id><Name>Jon Huertas</Name><SortOrder>0</SortOrder></Actor>")
                .unwrap();
        let node = document.root_element();

        let mut changes = Vec::new();
        let mut actor = CastMember::default();
        actor
            .deserialize_observed(Some(&node), &mut |property: &'static str| changes.push(property))
            .unwrap();

        // sort_order already held 0, so it is not reported
        assert_eq!(changes, vec!["id", "name"]);

        changes.clear();
        actor
            .deserialize_observed(Some(&node), &mut |property: &'static str| changes.push(property))
            .unwrap();
        assert!(changes.is_empty());
    }
}
