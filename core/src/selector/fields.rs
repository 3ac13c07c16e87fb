//! Selector nodes for the listings search endpoint.
//!
//! The tree mirrors the provider's response: `FullSearchResponseFields` is
//! the root, and the listing data proper lives under
//! `search -> result -> listings -> listing`.

use super::{field_selector, FieldSelector};

field_selector! {
    /// Fields of a single listing (the provider's `Listing` object).
    pub struct ListingSearchFields {
        contract_type: bool,
        listings_count: bool,
        property_developers: bool,
        source_id: bool,
        display_address_type: bool,
        amenities: bool,
        usable_areas: bool,
        construction_status: bool,
        listing_type: bool,
        description: bool,
        title: bool,
        stamps: bool,
        created_at: bool,
        floors: bool,
        unit_types: bool,
        non_activation_reason: bool,
        provider_id: bool,
        property_type: bool,
        unit_sub_types: bool,
        units_on_the_floor: bool,
        legacy_id: bool,
        id: bool,
        portal: bool,
        unit_floor: bool,
        parking_spaces: bool,
        updated_at: bool,
        address: bool,
        suites: bool,
        publication_type: bool,
        external_id: bool,
        bathrooms: bool,
        usage_types: bool,
        total_areas: bool,
        advertiser_id: bool,
        advertiser_contact: bool,
        whatsapp_number: bool,
        bedrooms: bool,
        accept_exchange: bool,
        pricing_infos: bool,
        show_price: bool,
        resale: bool,
        buildings: bool,
        capacity_limit: bool,
        status: bool,
        price_suggestion: bool,
        condominium_name: bool,
        modality: bool,
        enhanced_development: bool,
    }
}

field_selector! {
    /// Fields of the advertiser account attached to a listing.
    pub struct AccountSearchFields {
        id: bool,
        name: bool,
        logo_url: bool,
        license_number: bool,
        show_address: bool,
        legacy_vivareal_id: bool,
        legacy_zap_id: bool,
        created_date: bool,
        tier: bool,
        trust_score: bool,
        total_count_by_filter: bool,
        total_count_by_advertiser: bool,
    }
}

field_selector! {
    /// Fields of the units grouped under a development listing.
    pub struct ListingChildrenSearchFields {
        id: bool,
        usable_areas: bool,
        total_areas: bool,
        bedrooms: bool,
        bathrooms: bool,
        parking_spaces: bool,
        pricing_infos: bool,
    }
}

field_selector! {
    /// One entry of the result list: the listing plus its account, media
    /// and links. Not to be confused with `ListingSearchFields`.
    pub struct ListingsSearchResponseFields {
        listing: ListingSearchFields,
        account: AccountSearchFields,
        medias: bool,
        account_link: bool,
        link: bool,
        children: ListingChildrenSearchFields,
    }
}

field_selector! {
    pub struct ResultSearchResponseFields {
        listings: ListingsSearchResponseFields,
    }
}

field_selector! {
    pub struct SearchResponseFields {
        result: ResultSearchResponseFields,
        total_count: bool,
    }
}

field_selector! {
    pub struct DevelopmentsSearchResponseFields {
        search: SearchResponseFields,
    }
}

field_selector! {
    pub struct ExpansionSearchResponseFields {
        search: SearchResponseFields,
    }
}

field_selector! {
    pub struct NearbySearchResponseFields {
        search: SearchResponseFields,
    }
}

field_selector! {
    pub struct SuperPremiumSearchResponseFields {
        search: SearchResponseFields,
    }
}

field_selector! {
    pub struct TopoFixoSearchResponseFields {
        search: SearchResponseFields,
    }
}

field_selector! {
    /// Root of the search response.
    ///
    /// Besides the main `search` block the provider can return several
    /// promoted blocks (developments, nearby listings, paid placements);
    /// each is selected independently.
    pub struct FullSearchResponseFields {
        developments: DevelopmentsSearchResponseFields,
        expansion: ExpansionSearchResponseFields,
        nearby: NearbySearchResponseFields,
        search: SearchResponseFields,
        super_premium: SuperPremiumSearchResponseFields,
        topo_fixo: TopoFixoSearchResponseFields,
        page: bool,
        full_uri_fragments: bool,
    }
}

impl FullSearchResponseFields {
    /// Every listing field of the main result list, plus its total count.
    ///
    /// This is the selection `ListingData` is built from.
    pub fn listing_search() -> Self {
        let mut search = SearchResponseFields {
            total_count: true,
            ..Default::default()
        };
        search.result.listings.listing = ListingSearchFields::all();
        Self {
            search,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn is_flat_list(s: &str) -> bool {
        !s.is_empty()
            && s.split(", ")
                .all(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_alphabetic()))
    }

    #[test]
    fn empty_listing_selection() {
        assert_eq!(ListingSearchFields::default().include_fields(), "");
    }

    #[test]
    fn listing_selection_with_some_fields() {
        let fields = ListingSearchFields {
            id: true,
            title: true,
            source_id: true,
            ..Default::default()
        };
        let generated = fields.include_fields();
        // Declaration order, not construction order.
        assert_eq!(generated, "sourceId, title, id");
        assert!(is_flat_list(&generated));
    }

    #[test]
    fn nested_listing_selection() {
        let listings = ListingsSearchResponseFields {
            listing: ListingSearchFields {
                id: true,
                title: true,
                source_id: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let generated = listings.include_fields();
        assert_eq!(generated, "listing(sourceId, title, id)");

        let inner = &generated["listing(".len()..generated.len() - 1];
        assert!(is_flat_list(inner));
        assert_eq!(inner.split(',').count(), 3);
    }

    #[test]
    fn empty_nested_selection_is_elided() {
        let listings = ListingsSearchResponseFields {
            listing: ListingSearchFields::default(),
            ..Default::default()
        };
        assert_eq!(listings.include_fields(), "");
    }

    #[test]
    fn all_fields_reach_every_branch() {
        let generated = FullSearchResponseFields::default()
            .select_all()
            .include_fields();
        for name in [
            "search",
            "result",
            "listings",
            "listing",
            "address",
            "developments",
            "expansion",
            "nearby",
            "super_premium",
            "topo_fixo",
        ] {
            assert!(generated.contains(name), "missing {name}");
        }
        assert!(generated.starts_with("developments(search(result(listings(listing(contractType, "));
        assert!(generated.ends_with("topo_fixo(search(result(listings(listing(contractType, listingsCount, propertyDevelopers, sourceId, displayAddressType, amenities, usableAreas, constructionStatus, listingType, description, title, stamps, createdAt, floors, unitTypes, nonActivationReason, providerId, propertyType, unitSubTypes, unitsOnTheFloor, legacyId, id, portal, unitFloor, parkingSpaces, updatedAt, address, suites, publicationType, externalId, bathrooms, usageTypes, totalAreas, advertiserId, advertiserContact, whatsappNumber, bedrooms, acceptExchange, pricingInfos, showPrice, resale, buildings, capacityLimit, status, priceSuggestion, condominiumName, modality, enhancedDevelopment), account(id, name, logoUrl, licenseNumber, showAddress, legacyVivarealId, legacyZapId, createdDate, tier, trustScore, totalCountByFilter, totalCountByAdvertiser), medias, accountLink, link, children(id, usableAreas, totalAreas, bedrooms, bathrooms, parkingSpaces, pricingInfos))), totalCount)), page, fullUriFragments"));
    }

    #[test]
    fn select_all_twice_serializes_identically() {
        let once = FullSearchResponseFields::all();
        let twice = once.select_all();
        assert_eq!(once.include_fields(), twice.include_fields());
    }

    #[test]
    fn single_nested_flag() {
        let fields = FullSearchResponseFields {
            search: SearchResponseFields {
                total_count: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(fields.include_fields(), "search(totalCount)");
    }

    #[test]
    fn inactive_search_block_renders_nothing() {
        let fields = FullSearchResponseFields {
            search: SearchResponseFields::default(),
            ..Default::default()
        };
        assert_eq!(fields.include_fields(), "");
    }

    #[test]
    fn multiple_branches() {
        let fields = FullSearchResponseFields {
            search: SearchResponseFields {
                total_count: true,
                ..Default::default()
            },
            expansion: ExpansionSearchResponseFields {
                search: SearchResponseFields {
                    total_count: true,
                    ..Default::default()
                },
            },
            ..Default::default()
        };
        assert_eq!(
            fields.include_fields(),
            "expansion(search(totalCount)), search(totalCount)"
        );
        assert_eq!(fields.include_fields().split(',').count(), 2);
    }

    #[test]
    fn only_on_listing_fields() {
        let fields = ListingSearchFields::only(&["pricing_infos", "id"]).unwrap();
        assert_eq!(fields.include_fields(), "id, pricingInfos");
    }

    #[test]
    fn only_rejects_nested_field_of_root() {
        let err = FullSearchResponseFields::only(&["page", "search"]).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidField { selector: "FullSearchResponseFields", ref field } if field == "search"
        ));
    }

    #[test]
    fn listing_search_preset() {
        let preset = FullSearchResponseFields::listing_search().include_fields();
        assert!(preset.starts_with("search(result(listings(listing(contractType, "));
        assert!(preset.ends_with("enhancedDevelopment))), totalCount)"));
    }

    #[test]
    fn selection_loads_from_json() {
        let fields: FullSearchResponseFields = serde_json::from_value(serde_json::json!({
            "search": {"result": {"listings": {"listing": {"id": true, "bedrooms": true}}}}
        }))
        .unwrap();
        assert_eq!(
            fields.include_fields(),
            "search(result(listings(listing(id, bedrooms))))"
        );
    }
}
