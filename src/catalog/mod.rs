use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::models::{Contact, FaqItem, Language, Service, Website};

// Tile images live in a different container path than field-work collections
const HOME_CATEGORY_BASE_URL: &str =
    "https://kaamlo.blob.core.windows.net/kaamloimages/homecategories/";

pub const SITE_URL: &str = "https://kaamlo.com";

pub const DEFAULT_PHONE: &str = "+91 9028302467";
pub const DEFAULT_EMAIL: &str = "vakaamlo@gmail.com";

// Fixed display order for the directory
pub const SERVICE_ORDER: [&str; 19] = [
    "solar-setup",
    "websites-mobile-app-development",
    "interior-designs",
    "elevations",
    "raw-materials",
    "furnitures",
    "plumber",
    "electrician",
    "windows-doors-mesh",
    "steel-iron-railings",
    "glass-homes",
    "pop-puc-services",
    "layout-planning",
    "painting",
    "floor-and-tiles",
    "carpentry",
    "office-setup",
    "gardening",
    "construction",
];

const SERVICE_AREA: [&str; 15] = [
    "Nagpur City",
    "Ramtek",
    "Kamptee",
    "Katol",
    "Umred",
    "Kalmeshwar",
    "Narkhed",
    "Mauda",
    "Parseoni",
    "Saoner",
    "Hingna",
    "Kuhi",
    "Bhiwapur",
    "Kapsi",
    "Koradi",
];

struct ServiceDef {
    id: &'static str,
    icon: &'static str,
    title: &'static str,
    subtitle: &'static str,
    tile_file: Option<&'static str>,
    what_we_do: &'static [&'static str],
    faq: &'static [(&'static str, &'static str)],
    websites: &'static [(&'static str, &'static str, &'static str)],
    email: Option<&'static str>,
}

const SERVICE_DEFS: [ServiceDef; 19] = [
    ServiceDef {
        id: "solar-setup",
        icon: "\u{2600}\u{fe0f}",
        title: "Solar Setup",
        subtitle: "Professional solar panel installation and renewable energy solutions",
        tile_file: Some("solar.jpg"),
        what_we_do: &[
            "Solar panel installation",
            "Solar system design and consultation",
            "Grid-tied and off-grid solutions",
            "Solar inverter installation",
            "Battery backup systems",
            "Solar system maintenance and repair",
            "Government subsidy assistance",
            "Energy efficiency assessment",
        ],
        faq: &[
            (
                "How much can I save with solar panels?",
                "Solar panels can reduce your electricity bills by 70-90% depending on your system size and energy consumption. Most systems pay for themselves within 5-7 years.",
            ),
            (
                "Do you help with government subsidies and incentives?",
                "Yes, we assist with all government subsidy applications and help you avail maximum benefits from solar energy incentives and tax credits.",
            ),
            (
                "How long does solar panel installation take?",
                "A typical residential solar installation takes 2-5 days, depending on the system size and complexity. We ensure minimal disruption to your daily routine.",
            ),
            (
                "What warranty do you provide on solar installations?",
                "We provide comprehensive warranties covering panels (25 years), inverters (5-10 years), and workmanship (5 years) to ensure your investment is protected.",
            ),
        ],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "websites-mobile-app-development",
        icon: "\u{1f4bb}",
        title: "Website and Mobile App Development",
        subtitle: "Professional website and mobile app development services to help your business establish a strong online presence and reach customers on all devices",
        tile_file: Some("websitemobile.jpg"),
        what_we_do: &[
            "Custom website design and development",
            "Responsive web applications",
            "Mobile app development (iOS & Android)",
            "E-commerce solutions",
            "Content Management Systems (CMS)",
            "API integration and backend development",
            "Website maintenance and updates",
            "SEO optimization",
        ],
        faq: &[],
        websites: &[
            (
                "Kunda Electricals and Solar",
                "https://www.kundaelectricalsandsolar.com/",
                "Professional electrical and solar services website",
            ),
            (
                "GP Manapur",
                "https://www.gpmanapur.in/",
                "Website for Gram Panchayat Manapur",
            ),
            (
                "GP Pathrai",
                "https://www.gppathrai.in/",
                "Website for Gram Panchayat Pathrai",
            ),
            (
                "GP Karwahi",
                "http://gpkarwahi.in/",
                "Website for Gram Panchayat Karwahi",
            ),
        ],
        email: None,
    },
    ServiceDef {
        id: "interior-designs",
        icon: "\u{1f3a8}",
        title: "Interior Designs",
        subtitle: "Transform your space with beautiful and functional interior designs",
        tile_file: Some("interior.jpg"),
        what_we_do: &[
            "Residential interior design",
            "Modular kitchen design",
            "False ceiling and lighting design",
            "Space planning and furniture layout",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "elevations",
        icon: "\u{1f3d7}\u{fe0f}",
        title: "Elevations",
        subtitle: "Professional elevation design and construction services",
        tile_file: Some("elevations.jpg"),
        what_we_do: &[
            "Front elevation design",
            "3D elevation rendering",
            "Elevation construction and cladding",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "raw-materials",
        icon: "\u{1f9f1}",
        title: "Raw Materials Supply",
        subtitle: "Quality raw materials for construction and manufacturing",
        tile_file: Some("rawmaterials.jpg"),
        what_we_do: &[
            "Cement, sand and aggregate supply",
            "Bricks and blocks",
            "Steel and reinforcement supply",
            "On-site delivery",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "furnitures",
        icon: "\u{1fa91}",
        title: "Furnitures",
        subtitle: "Quality furniture solutions for every room in your home",
        tile_file: Some("furniture.jpg"),
        what_we_do: &[
            "Custom furniture manufacturing",
            "Sofa and bed design",
            "Wardrobes and storage units",
            "Furniture repair and polishing",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "plumber",
        icon: "\u{1f527}",
        title: "Plumber",
        subtitle: "Professional plumbing services for your home and business",
        tile_file: Some("plumber.jpg"),
        what_we_do: &[
            "Pipe installation and repair",
            "Leak detection and fixing",
            "Drain cleaning and unclogging",
            "Water heater installation",
            "Bathroom and kitchen plumbing",
            "Emergency plumbing services",
        ],
        faq: &[
            (
                "How quickly can you respond to emergency plumbing calls?",
                "We offer 24/7 emergency plumbing services and typically respond within 1-2 hours for urgent situations.",
            ),
            (
                "Do you provide warranties on your plumbing work?",
                "Yes, we provide warranties on all our plumbing installations and repairs. The warranty period varies depending on the type of work performed.",
            ),
            (
                "What payment methods do you accept?",
                "We accept cash, credit cards, debit cards, and digital payment methods for your convenience.",
            ),
            (
                "Are your plumbers licensed and insured?",
                "Yes, all our plumbers are fully licensed, insured, and experienced professionals.",
            ),
        ],
        websites: &[],
        email: Some("plumbervakaamlo@gmail.com"),
    },
    ServiceDef {
        id: "electrician",
        icon: "\u{26a1}",
        title: "Electrician",
        subtitle: "Expert electrical solutions for residential and commercial needs",
        tile_file: Some("electrician.jpg"),
        what_we_do: &[
            "Wiring and rewiring",
            "Switchboard and MCB installation",
            "Fan, light and appliance fitting",
            "Earthing and safety inspection",
            "Emergency electrical repairs",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "windows-doors-mesh",
        icon: "\u{1fa9f}",
        title: "Windows, Doors & Mesh",
        subtitle: "Premium windows, doors and mesh solutions",
        tile_file: Some("doors.jpg"),
        what_we_do: &[
            "UPVC and aluminium windows",
            "Wooden and flush doors",
            "Mosquito mesh installation",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "steel-iron-railings",
        icon: "\u{1f6e1}\u{fe0f}",
        title: "Steel & Iron Railings",
        subtitle: "Durable and elegant steel and iron railing solutions",
        tile_file: Some("railings.jpg"),
        what_we_do: &[
            "Staircase railings",
            "Balcony railings",
            "Gates and grills fabrication",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "glass-homes",
        icon: "\u{1fa9f}",
        title: "Glass for Homes",
        subtitle: "Premium glass solutions for modern homes",
        tile_file: Some("glass.jpg"),
        what_we_do: &[
            "Toughened glass partitions",
            "Glass railings",
            "Mirrors and shower enclosures",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "pop-puc-services",
        icon: "\u{1f3db}\u{fe0f}",
        title: "PoP & PUC Services",
        subtitle: "Professional PoP (Plaster of Paris) and PUC (Pollution Under Control) services",
        tile_file: Some("pop.jpg"),
        what_we_do: &[
            "False ceiling in Plaster of Paris",
            "Wall punning and finishing",
            "Decorative cornices and mouldings",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "layout-planning",
        icon: "\u{1f4d0}",
        title: "Layout Planning",
        subtitle: "Professional space planning and layout design services for homes and commercial spaces",
        tile_file: Some("layout.jpg"),
        what_we_do: &[
            "Residential layout planning",
            "Commercial space planning",
            "Plot subdivision and site layout",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "painting",
        icon: "\u{1f3a8}",
        title: "Painting Services",
        subtitle: "Professional interior and exterior painting services for homes and commercial spaces",
        tile_file: Some("painting.jpg"),
        what_we_do: &[
            "Interior wall painting",
            "Exterior and weatherproof painting",
            "Texture and stencil work",
            "Wood and metal painting",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "floor-and-tiles",
        icon: "\u{1f9f1}",
        title: "Floor & Tiles",
        subtitle: "Professional flooring and tiling solutions for homes and commercial spaces",
        tile_file: Some("tiles.jpg"),
        what_we_do: &[
            "Vitrified and ceramic tiling",
            "Marble and granite flooring",
            "Bathroom and kitchen tiling",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "carpentry",
        icon: "\u{1fab5}",
        title: "Carpentry & Woodwork",
        subtitle: "Expert carpentry and woodwork services for custom furniture and home improvements",
        tile_file: Some("carpentry.jpg"),
        what_we_do: &[
            "Custom woodwork and joinery",
            "Door and window frames",
            "Modular furniture assembly",
            "Wood repair and restoration",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "office-setup",
        icon: "\u{1f3e2}",
        title: "Office Setup",
        subtitle: "Complete office setup and workspace solutions for businesses",
        tile_file: Some("office.jpg"),
        what_we_do: &[
            "Workstation planning and installation",
            "Office partitions and cabins",
            "Conference room setup",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "gardening",
        icon: "\u{1f333}",
        title: "Gardening & Landscaping",
        subtitle: "Professional gardening and landscaping services for homes and commercial spaces",
        tile_file: Some("gardening.jpg"),
        what_we_do: &[
            "Garden design and landscaping",
            "Lawn laying and maintenance",
            "Plant selection and care",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
    ServiceDef {
        id: "construction",
        icon: "\u{1f3d7}\u{fe0f}",
        title: "Construction Services",
        subtitle: "Complete construction and building solutions for residential and commercial projects",
        tile_file: Some("construction.jpg"),
        what_we_do: &[
            "Residential construction",
            "Commercial construction",
            "Renovation and remodeling",
            "Project management and supervision",
        ],
        faq: &[],
        websites: &[],
        email: None,
    },
];

// id -> ((hi title, hi subtitle), (mr title, mr subtitle))
type Translation = ((&'static str, &'static str), (&'static str, &'static str));

fn translations() -> HashMap<&'static str, Translation> {
    HashMap::from([
        (
            "solar-setup",
            (
                ("सोलर सेटअप", "पेशेवर सोलर पैनल स्थापना और नवीकरणीय ऊर्जा समाधान"),
                ("सोलर सेटअप", "व्यावसायिक सोलर पॅनेल स्थापना आणि नूतनीकरणीय ऊर्जा उपाय"),
            ),
        ),
        (
            "websites-mobile-app-development",
            (
                (
                    "वेबसाइट और मोबाइल ऐप डेवलपमेंट",
                    "पेशेवर वेबसाइट और मोबाइल ऐप डेवलपमेंट सेवाएं आपके व्यवसाय को मजबूत ऑनलाइन उपस्थिति स्थापित करने और सभी उपकरणों पर ग्राहकों तक पहुंचने में मदद करने के लिए",
                ),
                (
                    "वेबसाइट आणि मोबाइल ऍप डेव्हलपमेंट",
                    "तुमच्या व्यवसायाला मजबूत ऑनलाइन उपस्थिती स्थापित करण्यात आणि सर्व उपकरणांवर ग्राहकांपर्यंत पोहोचण्यात मदत करण्यासाठी व्यावसायिक वेबसाइट आणि मोबाइल ऍप डेव्हलपमेंट सेवा",
                ),
            ),
        ),
        (
            "interior-designs",
            (
                ("इंटीरियर डिजाइन", "सुंदर इंटीरियर डिजाइन के साथ अपने स्थान को बदलें"),
                ("इंटीरियर डिझाइन", "सुंदर इंटीरियर डिझाइनसह तुमची जागा बदला"),
            ),
        ),
        (
            "elevations",
            (
                ("एलिवेशन", "पेशेवर एलिवेशन डिजाइन और निर्माण सेवाएं"),
                ("एलिव्हेशन", "व्यावसायिक एलिव्हेशन डिझाइन आणि बांधकाम सेवा"),
            ),
        ),
        (
            "raw-materials",
            (
                ("कच्चा माल आपूर्ति", "गुणवत्तापूर्ण निर्माण और भवन सामग्री"),
                ("कच्चा माल पुरवठा", "गुणवत्तापूर्ण बांधकाम आणि बिल्डिंग सामग्री"),
            ),
        ),
        (
            "furnitures",
            (
                ("फर्नीचर", "आपके घर और कार्यालय के लिए गुणवत्तापूर्ण फर्नीचर"),
                ("फर्निचर", "तुमच्या घर आणि ऑफिससाठी गुणवत्तापूर्ण फर्निचर"),
            ),
        ),
        (
            "plumber",
            (
                ("प्लंबर", "आपके घर और व्यवसाय के लिए पेशेवर प्लंबिंग सेवाएं"),
                ("प्लंबर", "तुमच्या घर आणि व्यवसायासाठी व्यावसायिक प्लंबिंग सेवा"),
            ),
        ),
        (
            "electrician",
            (
                ("इलेक्ट्रीशियन", "आवासीय और वाणिज्यिक जरूरतों के लिए विशेषज्ञ विद्युत समाधान"),
                ("इलेक्ट्रीशियन", "निवासी आणि व्यावसायिक गरजांसाठी तज्ञ विद्युत उपाय"),
            ),
        ),
        (
            "windows-doors-mesh",
            (
                ("खिड़कियां, दरवाजे और मेश", "प्रीमियम खिड़कियां, दरवाजे और मेश समाधान"),
                ("खिडक्या, दरवाजे आणि मेश", "प्रीमियम खिडक्या, दरवाजे आणि मेश उपाय"),
            ),
        ),
        (
            "steel-iron-railings",
            (
                ("स्टील और लोहे की रेलिंग", "टिकाऊ स्टील और लोहे की रेलिंग समाधान"),
                ("स्टील आणि लोखंड रेलिंग", "टिकाऊ स्टील आणि लोखंड रेलिंग उपाय"),
            ),
        ),
        (
            "glass-homes",
            (
                ("घरों के लिए कांच", "आधुनिक घरों के लिए प्रीमियम कांच समाधान"),
                ("घरांसाठी काच", "आधुनिक घरांसाठी प्रीमियम काच उपाय"),
            ),
        ),
        (
            "pop-puc-services",
            (
                ("PoP और PUC सेवाएं", "पेशेवर PoP (प्लास्टर ऑफ पेरिस) और PUC सेवाएं"),
                ("PoP आणि PUC सेवा", "व्यावसायिक PoP (प्लास्टर ऑफ पॅरिस) आणि PUC सेवा"),
            ),
        ),
        (
            "layout-planning",
            (
                (
                    "लेआउट प्लानिंग",
                    "घरों और वाणिज्यिक स्थानों के लिए पेशेवर स्पेस प्लानिंग और लेआउट डिजाइन सेवाएं",
                ),
                (
                    "लेआउट प्लानिंग",
                    "घरां आणि व्यावसायिक जागांसाठी व्यावसायिक स्पेस प्लानिंग आणि लेआउट डिझाइन सेवा",
                ),
            ),
        ),
        (
            "painting",
            (
                (
                    "पेंटिंग सेवाएं",
                    "घरों और वाणिज्यिक स्थानों के लिए पेशेवर आंतरिक और बाहरी पेंटिंग सेवाएं",
                ),
                (
                    "पेंटिंग सेवा",
                    "घरां आणि व्यावसायिक जागांसाठी व्यावसायिक आतील आणि बाहेरील पेंटिंग सेवा",
                ),
            ),
        ),
        (
            "floor-and-tiles",
            (
                (
                    "फ्लोर और टाइल्स",
                    "घरों और वाणिज्यिक स्थानों के लिए पेशेवर फ्लोरिंग और टाइलिंग समाधान",
                ),
                (
                    "फ्लोर आणि टाइल्स",
                    "घरां आणि व्यावसायिक जागांसाठी व्यावसायिक फ्लोरिंग आणि टाइलिंग उपाय",
                ),
            ),
        ),
        (
            "carpentry",
            (
                (
                    "बढ़ईगीरी और लकड़ी का काम",
                    "कस्टम फर्नीचर और घर सुधार के लिए विशेषज्ञ बढ़ईगीरी और लकड़ी का काम सेवाएं",
                ),
                (
                    "सुतारकाम आणि लाकडी काम",
                    "कस्टम फर्निचर आणि घर सुधारणांसाठी तज्ञ सुतारकाम आणि लाकडी काम सेवा",
                ),
            ),
        ),
        (
            "office-setup",
            (
                ("ऑफिस सेटअप", "व्यवसायों के लिए पूर्ण ऑफिस सेटअप और वर्कस्पेस समाधान"),
                ("ऑफिस सेटअप", "व्यवसायांसाठी पूर्ण ऑफिस सेटअप आणि वर्कस्पेस उपाय"),
            ),
        ),
        (
            "gardening",
            (
                (
                    "बागवानी और लैंडस्केपिंग",
                    "घरों और वाणिज्यिक स्थानों के लिए पेशेवर बागवानी और लैंडस्केपिंग सेवाएं",
                ),
                (
                    "बागकाम आणि लँडस्केपिंग",
                    "घरां आणि व्यावसायिक जागांसाठी व्यावसायिक बागकाम आणि लँडस्केपिंग सेवा",
                ),
            ),
        ),
        (
            "construction",
            (
                (
                    "निर्माण सेवाएं",
                    "आवासीय और वाणिज्यिक परियोजनाओं के लिए पूर्ण निर्माण और भवन समाधान",
                ),
                (
                    "बांधकाम सेवा",
                    "निवासी आणि व्यावसायिक प्रकल्पांसाठी पूर्ण बांधकाम आणि इमारत उपाय",
                ),
            ),
        ),
    ])
}

fn build_service(def: &ServiceDef) -> Service {
    Service {
        id: def.id.to_string(),
        icon: def.icon.to_string(),
        title: def.title.to_string(),
        subtitle: def.subtitle.to_string(),
        tile_image: def
            .tile_file
            .map(|f| format!("{}{}", HOME_CATEGORY_BASE_URL, f)),
        what_we_do: def.what_we_do.iter().map(|s| s.to_string()).collect(),
        faq: def
            .faq
            .iter()
            .map(|(q, a)| FaqItem {
                question: q.to_string(),
                answer: a.to_string(),
            })
            .collect(),
        service_area: SERVICE_AREA.iter().map(|s| s.to_string()).collect(),
        websites: def
            .websites
            .iter()
            .map(|(name, url, description)| Website {
                name: name.to_string(),
                url: url.to_string(),
                description: Some(description.to_string()),
            })
            .collect(),
        contact: Contact {
            phone: DEFAULT_PHONE.to_string(),
            email: def.email.unwrap_or(DEFAULT_EMAIL).to_string(),
        },
    }
}

lazy_static! {
    static ref SERVICES: HashMap<&'static str, Service> = SERVICE_DEFS
        .iter()
        .map(|def| (def.id, build_service(def)))
        .collect();
    static ref TRANSLATIONS: HashMap<&'static str, Translation> = translations();
}

pub fn get(id: &str) -> Option<&'static Service> {
    SERVICES.get(id)
}

// Every service, in the fixed display order
pub fn all() -> Vec<&'static Service> {
    SERVICE_ORDER.iter().filter_map(|id| SERVICES.get(id)).collect()
}

pub fn service_ids() -> impl Iterator<Item = &'static str> {
    SERVICE_ORDER.iter().copied()
}

// Localized copy of a service; English and untranslated ids return the base text
pub fn localized(id: &str, lang: Language) -> Option<Service> {
    let service = get(id)?;
    let mut localized = service.clone();

    if lang != Language::En {
        if let Some((hi, mr)) = TRANSLATIONS.get(id) {
            let (title, subtitle) = match lang {
                Language::Mr => *mr,
                _ => *hi,
            };
            localized.title = title.to_string();
            localized.subtitle = subtitle.to_string();
        }
    }

    Some(localized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_and_catalog_cover_the_same_ids() {
        assert_eq!(SERVICE_ORDER.len(), SERVICES.len());
        for id in SERVICE_ORDER {
            assert!(SERVICES.contains_key(id), "missing service: {}", id);
        }
    }

    #[test]
    fn all_returns_services_in_display_order() {
        let services = all();
        assert_eq!(services.len(), SERVICE_ORDER.len());
        assert_eq!(services[0].id, "solar-setup");
        assert_eq!(services.last().unwrap().id, "construction");
    }

    #[test]
    fn localized_swaps_title_and_subtitle() {
        let hi = localized("plumber", Language::Hi).unwrap();
        assert_eq!(hi.title, "प्लंबर");
        let mr = localized("plumber", Language::Mr).unwrap();
        assert_eq!(mr.subtitle, "तुमच्या घर आणि व्यवसायासाठी व्यावसायिक प्लंबिंग सेवा");
        // Untouched fields keep the base data
        assert_eq!(hi.contact.email, "plumbervakaamlo@gmail.com");
    }

    #[test]
    fn localized_falls_back_to_english() {
        let en = localized("plumber", Language::En).unwrap();
        assert_eq!(en.title, "Plumber");
        assert!(localized("nonexistent", Language::Hi).is_none());
    }

    #[test]
    fn language_from_code_defaults_to_english() {
        assert_eq!(Language::from_code("hi"), Language::Hi);
        assert_eq!(Language::from_code("mr"), Language::Mr);
        assert_eq!(Language::from_code("fr"), Language::En);
        assert_eq!(Language::from_code(""), Language::En);
    }

    #[test]
    fn tile_images_point_at_the_home_category_container() {
        let service = get("plumber").unwrap();
        assert_eq!(
            service.tile_image.as_deref(),
            Some("https://kaamlo.blob.core.windows.net/kaamloimages/homecategories/plumber.jpg")
        );
    }
}
